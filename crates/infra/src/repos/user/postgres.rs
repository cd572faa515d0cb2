use super::IUserRepo;
use remindd_domain::{User, ID};
use sqlx::{FromRow, PgPool};

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    id: i64,
    name: String,
    phone_number: Option<String>,
    timezone: String,
}

impl From<UserRaw> for User {
    fn from(raw: UserRaw) -> Self {
        User {
            id: ID::new(raw.id),
            name: raw.name,
            phone_number: raw.phone_number,
            timezone: raw.timezone.parse().unwrap_or(chrono_tz::UTC),
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<User> {
        let raw = sqlx::query_as::<_, UserRaw>(
            r#"
            INSERT INTO users (name, phone_number, timezone)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&user.name)
        .bind(&user.phone_number)
        .bind(user.timezone.name())
        .fetch_one(&self.pool)
        .await?;

        Ok(raw.into())
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = $2, phone_number = $3, timezone = $4
            WHERE id = $1
            "#,
        )
        .bind(user.id.inner())
        .bind(&user.name)
        .bind(&user.phone_number)
        .bind(user.timezone.name())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, user_id: ID) -> anyhow::Result<Option<User>> {
        let raw = sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.inner())
        .fetch_optional(&self.pool)
        .await?;

        Ok(raw.map(|raw| raw.into()))
    }
}
