use uuid::Uuid;

/// A registered author.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string, never the plain password.
    pub password: String,
}
