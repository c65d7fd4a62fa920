use crate::data::models::NewUser;
use crate::data::models::User;
use crate::schema::users;
use bcrypt::{hash, verify};
use diesel::prelude::*;

pub struct UserRepository;

impl UserRepository {
    pub fn find_by_email(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<Option<User>, diesel::result::Error> {
        users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first::<User>(conn)
            .optional()
    }

    pub fn verify_password(
        stored_hash: &str,
        input_password: &str,
    ) -> Result<bool, bcrypt::BcryptError> {
        verify(input_password, stored_hash)
    }

    pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
        hash(password, cost)
    }

    /// Inserts a user whose password has already been hashed.
    pub fn create_user(
        conn: &mut SqliteConnection,
        email: &str,
        password_hash: &str,
    ) -> Result<User, diesel::result::Error> {
        diesel::insert_into(users::table)
            .values(&NewUser {
                email,
                password: password_hash,
            })
            .execute(conn)?;

        users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first::<User>(conn)
    }

    pub fn email_exists(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<bool, diesel::result::Error> {
        use diesel::dsl::exists;
        use diesel::select;

        select(exists(users::table.filter(users::email.eq(email)))).get_result(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::bootstrap::test_connection;

    #[test]
    fn create_and_find_user() {
        let mut conn = test_connection();
        let hashed = UserRepository::hash_password("correct horse", 4).unwrap();

        assert!(!UserRepository::email_exists(&mut conn, "ana@example.com").unwrap());
        let user = UserRepository::create_user(&mut conn, "ana@example.com", &hashed).unwrap();
        assert!(UserRepository::email_exists(&mut conn, "ana@example.com").unwrap());

        let found = UserRepository::find_by_email(&mut conn, "ana@example.com")
            .unwrap()
            .expect("user exists");
        assert_eq!(found.user_id, user.user_id);
        assert!(UserRepository::verify_password(&found.password, "correct horse").unwrap());
        assert!(!UserRepository::verify_password(&found.password, "wrong horse").unwrap());
    }

    #[test]
    fn unknown_email_is_none() {
        let mut conn = test_connection();
        assert!(UserRepository::find_by_email(&mut conn, "nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_rejected_by_storage() {
        let mut conn = test_connection();
        UserRepository::create_user(&mut conn, "ana@example.com", "x").unwrap();
        assert!(UserRepository::create_user(&mut conn, "ana@example.com", "y").is_err());
    }
}
