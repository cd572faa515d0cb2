use super::IGroupRepo;
use remindd_domain::{Group, ID};
use sqlx::{FromRow, PgPool};

pub struct PostgresGroupRepo {
    pool: PgPool,
}

impl PostgresGroupRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GroupRaw {
    id: i64,
    name: String,
}

impl From<GroupRaw> for Group {
    fn from(raw: GroupRaw) -> Self {
        Group {
            id: ID::new(raw.id),
            name: raw.name,
        }
    }
}

#[derive(Debug, FromRow)]
struct MemberRaw {
    user_id: i64,
}

#[async_trait::async_trait]
impl IGroupRepo for PostgresGroupRepo {
    async fn insert(&self, group: &Group) -> anyhow::Result<Group> {
        let raw = sqlx::query_as::<_, GroupRaw>(
            r#"
            INSERT INTO groups (name)
            VALUES ($1)
            RETURNING *
            "#,
        )
        .bind(&group.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(raw.into())
    }

    async fn add_member(&self, group_id: ID, user_id: ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO group_members (group_id, user_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(group_id.inner())
        .bind(user_id.inner())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn members(&self, group_id: ID) -> anyhow::Result<Vec<ID>> {
        let raw = sqlx::query_as::<_, MemberRaw>(
            r#"
            SELECT user_id FROM group_members
            WHERE group_id = $1
            "#,
        )
        .bind(group_id.inner())
        .fetch_all(&self.pool)
        .await?;

        Ok(raw.into_iter().map(|raw| ID::new(raw.user_id)).collect())
    }
}
