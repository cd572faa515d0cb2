use super::ISubscriptionRepo;
use remindd_domain::{Subscription, SubscriptionKeys, ID};
use sqlx::{FromRow, PgPool};

pub struct PostgresSubscriptionRepo {
    pool: PgPool,
}

impl PostgresSubscriptionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SubscriptionRaw {
    id: i64,
    user_id: i64,
    title: String,
    endpoint: String,
    key_p256dh: String,
    key_auth: String,
}

impl From<SubscriptionRaw> for Subscription {
    fn from(raw: SubscriptionRaw) -> Self {
        Subscription {
            id: ID::new(raw.id),
            user_id: ID::new(raw.user_id),
            title: raw.title,
            endpoint: raw.endpoint,
            keys: SubscriptionKeys {
                p256dh: raw.key_p256dh,
                auth: raw.key_auth,
            },
        }
    }
}

#[async_trait::async_trait]
impl ISubscriptionRepo for PostgresSubscriptionRepo {
    async fn insert(&self, subscription: &Subscription) -> anyhow::Result<Subscription> {
        let raw = sqlx::query_as::<_, SubscriptionRaw>(
            r#"
            INSERT INTO subscriptions (user_id, title, endpoint, key_p256dh, key_auth)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(subscription.user_id.inner())
        .bind(&subscription.title)
        .bind(&subscription.endpoint)
        .bind(&subscription.keys.p256dh)
        .bind(&subscription.keys.auth)
        .fetch_one(&self.pool)
        .await?;

        Ok(raw.into())
    }

    async fn find_by_user(&self, user_id: ID) -> anyhow::Result<Vec<Subscription>> {
        let raw = sqlx::query_as::<_, SubscriptionRaw>(
            r#"
            SELECT * FROM subscriptions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.inner())
        .fetch_all(&self.pool)
        .await?;

        Ok(raw.into_iter().map(|raw| raw.into()).collect())
    }

    async fn delete(&self, subscription_id: ID) -> anyhow::Result<Option<Subscription>> {
        let raw = sqlx::query_as::<_, SubscriptionRaw>(
            r#"
            DELETE FROM subscriptions
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(subscription_id.inner())
        .fetch_optional(&self.pool)
        .await?;

        Ok(raw.map(|raw| raw.into()))
    }
}
