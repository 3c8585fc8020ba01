use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Form body for registration. Field names match the browser form.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub cpassword: String,
}

/// Form body for login.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Returned after a successful login. The token is shown exactly once;
/// only its hash is stored server-side.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user: PublicUser,
    pub has_profile: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_serializes_all_fields() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            name: "bob".into(),
            email: "bob@x.com".into(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("bob@x.com"));
        assert!(json.contains("\"name\":\"bob\""));
    }

    #[test]
    fn register_form_parses_urlencoded_fields() {
        let form: RegisterForm = serde_urlencoded::from_str(
            "username=bob&email=bob%40x.com&password=Abc12345&cpassword=Abc12345",
        )
        .unwrap();
        assert_eq!(form.username, "bob");
        assert_eq!(form.email, "bob@x.com");
        assert_eq!(form.password, form.cpassword);
    }
}
