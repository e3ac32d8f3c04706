use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{info, warn};
use uuid::Uuid;

use super::models::{
    Appointment, AppointmentDetail, AppointmentStatus, Listing, ListingFilter, ListingPublic,
    ListingSummary, ListingUpdate, Location, NewAppointment, NewListing, NewNotification,
    Notification, NotificationFeedItem, NotificationType, ProfileUpdate, Role, UserPublic,
};
use super::store::{Store, StoreError};

/// Number of extra attempts for idempotent reads hitting a transient failure.
/// Writes are never retried (duplicate side-effect risk).
const READ_RETRIES: u32 = 2;

const LISTING_COLUMNS: &str = "l.id, l.owner_id, l.title, l.description, l.address, l.city, \
     l.state, l.zip_code, l.price, l.bedrooms, l.bathrooms, l.area, l.property_type, \
     l.amenities, l.images, l.available, l.created_at, l.updated_at";

/// Postgres-backed [`Store`]. One pool, created at startup and shared.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect using `DATABASE_URL` and the configured pool limits.
    pub async fn connect() -> Result<Self, StoreError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| StoreError::Query("DATABASE_URL is not set".to_string()))?;

        let db_config = &crate::config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(Duration::from_secs(db_config.acquire_timeout_secs))
            .connect(&url)
            .await
            .map_err(map_sqlx_error)?;

        info!("database pool ready (max_connections={})", db_config.max_connections);
        Ok(Self { pool })
    }

    async fn owner_public(&self, owner_id: Uuid) -> Result<UserPublic, StoreError> {
        self.find_user(owner_id)
            .await?
            .ok_or_else(|| StoreError::Query(format!("listing owner {} missing", owner_id)))
    }
}

/// Retry loop for idempotent reads. Only `Unavailable` (connection-class)
/// errors are retried, with a short linear backoff; every other error, and
/// every write, passes through on the first attempt.
async fn with_read_retry<'a, T>(
    mut op: impl FnMut() -> Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>,
) -> Result<T, StoreError> {
    let mut attempt = 0u32;
    loop {
        match op().await {
            Err(StoreError::Unavailable(msg)) if attempt < READ_RETRIES => {
                attempt += 1;
                warn!("transient store error, retrying read (attempt {}): {}", attempt, msg);
                tokio::time::sleep(Duration::from_millis(50 * attempt as u64)).await;
            }
            other => return other,
        }
    }
}

/// Transient connection-class failures become `Unavailable`; everything else
/// stays a wrapped sqlx error.
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        _ => StoreError::Sqlx(err),
    }
}

#[derive(Debug, FromRow)]
struct ListingOwnerRow {
    #[sqlx(flatten)]
    listing: Listing,
    owner_name: String,
    owner_email: String,
    owner_phone: Option<String>,
    owner_role: Role,
}

impl ListingOwnerRow {
    fn into_public(self) -> ListingPublic {
        let owner = UserPublic {
            id: self.listing.owner_id,
            name: self.owner_name,
            email: self.owner_email,
            phone: self.owner_phone,
            role: self.owner_role,
        };
        ListingPublic::from_row(self.listing, owner)
    }
}

#[derive(Debug, FromRow)]
struct AppointmentDetailRow {
    id: Uuid,
    listing_id: Uuid,
    customer_id: Uuid,
    landlord_id: Uuid,
    date: NaiveDate,
    time: String,
    status: AppointmentStatus,
    message: String,
    created_at: DateTime<Utc>,
    // LEFT JOIN: all absent when the listing has been deleted
    l_title: Option<String>,
    l_address: Option<String>,
    l_city: Option<String>,
    l_state: Option<String>,
    l_zip_code: Option<String>,
    l_price: Option<i64>,
    l_images: Option<Vec<String>>,
    c_name: String,
    c_email: String,
    c_phone: Option<String>,
    c_role: Role,
    ll_name: String,
    ll_email: String,
    ll_phone: Option<String>,
    ll_role: Role,
}

impl AppointmentDetailRow {
    fn into_detail(self) -> AppointmentDetail {
        let listing = self.l_title.map(|title| ListingSummary {
            id: self.listing_id,
            title,
            location: Location {
                address: self.l_address.unwrap_or_default(),
                city: self.l_city.unwrap_or_default(),
                state: self.l_state.unwrap_or_default(),
                zip_code: self.l_zip_code,
            },
            price: self.l_price.unwrap_or_default(),
            images: self.l_images.unwrap_or_default(),
        });

        AppointmentDetail {
            id: self.id,
            listing,
            customer: UserPublic {
                id: self.customer_id,
                name: self.c_name,
                email: self.c_email,
                phone: self.c_phone,
                role: self.c_role,
            },
            landlord: UserPublic {
                id: self.landlord_id,
                name: self.ll_name,
                email: self.ll_email,
                phone: self.ll_phone,
                role: self.ll_role,
            },
            date: self.date,
            time: self.time,
            status: self.status,
            message: self.message,
            created_at: self.created_at,
        }
    }
}

const APPOINTMENT_DETAIL_SELECT: &str = "SELECT a.id, a.listing_id, a.customer_id, a.landlord_id, \
     a.date, a.\"time\", a.status, a.message, a.created_at, \
     l.title AS l_title, l.address AS l_address, l.city AS l_city, l.state AS l_state, \
     l.zip_code AS l_zip_code, l.price AS l_price, l.images AS l_images, \
     c.name AS c_name, c.email AS c_email, c.phone AS c_phone, c.role AS c_role, \
     ll.name AS ll_name, ll.email AS ll_email, ll.phone AS ll_phone, ll.role AS ll_role \
     FROM appointments a \
     LEFT JOIN listings l ON l.id = a.listing_id \
     JOIN users c ON c.id = a.customer_id \
     JOIN users ll ON ll.id = a.landlord_id";

#[derive(Debug, FromRow)]
struct NotificationFeedRow {
    id: Uuid,
    recipient_id: Uuid,
    sender_id: Option<Uuid>,
    #[sqlx(rename = "type")]
    kind: NotificationType,
    title: String,
    message: String,
    related_listing_id: Option<Uuid>,
    related_appointment_id: Option<Uuid>,
    read: bool,
    created_at: DateTime<Utc>,
    sender_name: Option<String>,
    listing_title: Option<String>,
}

impl NotificationFeedRow {
    fn into_item(self) -> NotificationFeedItem {
        NotificationFeedItem {
            notification: Notification {
                id: self.id,
                recipient_id: self.recipient_id,
                sender_id: self.sender_id,
                kind: self.kind,
                title: self.title,
                message: self.message,
                related_listing_id: self.related_listing_id,
                related_appointment_id: self.related_appointment_id,
                read: self.read,
                created_at: self.created_at,
            },
            sender_name: self.sender_name,
            listing_title: self.listing_title,
        }
    }
}

fn contains_pattern(value: &str) -> String {
    format!("%{}%", value)
}

fn push_listing_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ListingFilter) {
    // Showing only available listings is the default
    qb.push(" WHERE l.available = ");
    qb.push_bind(filter.available.unwrap_or(true));

    if let Some(city) = &filter.city {
        qb.push(" AND l.city ILIKE ");
        qb.push_bind(contains_pattern(city));
    }
    if let Some(state) = &filter.state {
        qb.push(" AND l.state ILIKE ");
        qb.push_bind(contains_pattern(state));
    }
    if let Some(location) = &filter.location {
        let pattern = contains_pattern(location);
        qb.push(" AND (l.address ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR l.city ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR l.state ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
    if let Some(min_price) = filter.min_price {
        qb.push(" AND l.price >= ");
        qb.push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        qb.push(" AND l.price <= ");
        qb.push_bind(max_price);
    }
    if let Some(min_bedrooms) = filter.min_bedrooms {
        qb.push(" AND l.bedrooms >= ");
        qb.push_bind(min_bedrooms);
    }
    if let Some(max_bedrooms) = filter.max_bedrooms {
        qb.push(" AND l.bedrooms <= ");
        qb.push_bind(max_bedrooms);
    }
    if let Some(property_type) = filter.property_type {
        qb.push(" AND l.property_type = ");
        qb.push_bind(property_type);
    }
    if let Some(search) = &filter.search {
        let pattern = contains_pattern(search);
        qb.push(" AND (l.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR l.description ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR l.address ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR l.city ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserPublic>, StoreError> {
        let pool = self.pool.clone();
        with_read_retry(move || {
            let pool = pool.clone();
            Box::pin(async move {
                sqlx::query_as::<_, UserPublic>(
                    "SELECT id, name, email, phone, role FROM users WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(&pool)
                .await
                .map_err(map_sqlx_error)
            })
        })
        .await
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<UserPublic, StoreError> {
        sqlx::query_as::<_, UserPublic>(
            "UPDATE users SET name = COALESCE($2, name), phone = COALESCE($3, phone) \
             WHERE id = $1 RETURNING id, name, email, phone, role",
        )
        .bind(id)
        .bind(update.name)
        .bind(update.phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .ok_or_else(|| StoreError::NotFound("User not found".to_string()))
    }

    async fn search_listings(
        &self,
        filter: &ListingFilter,
    ) -> Result<Vec<ListingPublic>, StoreError> {
        let pool = self.pool.clone();
        with_read_retry(move || {
            let pool = pool.clone();
            Box::pin(async move {
                let mut qb = QueryBuilder::<Postgres>::new(format!(
                    "SELECT {LISTING_COLUMNS}, u.name AS owner_name, u.email AS owner_email, \
                     u.phone AS owner_phone, u.role AS owner_role \
                     FROM listings l JOIN users u ON u.id = l.owner_id"
                ));
                push_listing_filter(&mut qb, filter);
                qb.push(" ORDER BY l.created_at DESC");

                let rows: Vec<ListingOwnerRow> = qb
                    .build_query_as()
                    .fetch_all(&pool)
                    .await
                    .map_err(map_sqlx_error)?;
                Ok(rows.into_iter().map(ListingOwnerRow::into_public).collect())
            })
        })
        .await
    }

    async fn find_listing(&self, id: Uuid) -> Result<Option<Listing>, StoreError> {
        let pool = self.pool.clone();
        with_read_retry(move || {
            let pool = pool.clone();
            Box::pin(async move {
                sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&pool)
                    .await
                    .map_err(map_sqlx_error)
            })
        })
        .await
    }

    async fn find_listing_public(&self, id: Uuid) -> Result<Option<ListingPublic>, StoreError> {
        let pool = self.pool.clone();
        with_read_retry(move || {
            let pool = pool.clone();
            Box::pin(async move {
                let row: Option<ListingOwnerRow> = sqlx::query_as(&format!(
                    "SELECT {LISTING_COLUMNS}, u.name AS owner_name, u.email AS owner_email, \
                     u.phone AS owner_phone, u.role AS owner_role \
                     FROM listings l JOIN users u ON u.id = l.owner_id WHERE l.id = $1"
                ))
                .bind(id)
                .fetch_optional(&pool)
                .await
                .map_err(map_sqlx_error)?;
                Ok(row.map(ListingOwnerRow::into_public))
            })
        })
        .await
    }

    async fn listings_by_owner(&self, owner_id: Uuid) -> Result<Vec<ListingPublic>, StoreError> {
        let pool = self.pool.clone();
        with_read_retry(move || {
            let pool = pool.clone();
            Box::pin(async move {
                let rows: Vec<ListingOwnerRow> = sqlx::query_as(&format!(
                    "SELECT {LISTING_COLUMNS}, u.name AS owner_name, u.email AS owner_email, \
                     u.phone AS owner_phone, u.role AS owner_role \
                     FROM listings l JOIN users u ON u.id = l.owner_id \
                     WHERE l.owner_id = $1 ORDER BY l.created_at DESC"
                ))
                .bind(owner_id)
                .fetch_all(&pool)
                .await
                .map_err(map_sqlx_error)?;
                Ok(rows.into_iter().map(ListingOwnerRow::into_public).collect())
            })
        })
        .await
    }

    async fn insert_listing(
        &self,
        owner_id: Uuid,
        new: NewListing,
    ) -> Result<ListingPublic, StoreError> {
        let listing: Listing = sqlx::query_as(
            "INSERT INTO listings \
             (id, owner_id, title, description, address, city, state, zip_code, price, \
              bedrooms, bathrooms, area, property_type, amenities, images, available) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(new.title)
        .bind(new.description)
        .bind(new.location.address)
        .bind(new.location.city)
        .bind(new.location.state)
        .bind(new.location.zip_code)
        .bind(new.price)
        .bind(new.bedrooms)
        .bind(new.bathrooms)
        .bind(new.area)
        .bind(new.property_type)
        .bind(new.amenities)
        .bind(Vec::<String>::new())
        .bind(new.available)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let owner = self.owner_public(owner_id).await?;
        Ok(ListingPublic::from_row(listing, owner))
    }

    async fn update_listing(
        &self,
        id: Uuid,
        expected_owner: Uuid,
        update: ListingUpdate,
    ) -> Result<Option<ListingPublic>, StoreError> {
        let (address, city, state, zip_code) = match update.location {
            Some(loc) => (Some(loc.address), Some(loc.city), Some(loc.state), loc.zip_code),
            None => (None, None, None, None),
        };

        let listing: Option<Listing> = sqlx::query_as(
            "UPDATE listings SET \
             title = COALESCE($3, title), \
             description = COALESCE($4, description), \
             address = COALESCE($5, address), \
             city = COALESCE($6, city), \
             state = COALESCE($7, state), \
             zip_code = COALESCE($8, zip_code), \
             price = COALESCE($9, price), \
             bedrooms = COALESCE($10, bedrooms), \
             bathrooms = COALESCE($11, bathrooms), \
             area = COALESCE($12, area), \
             property_type = COALESCE($13, property_type), \
             amenities = COALESCE($14, amenities), \
             available = COALESCE($15, available), \
             updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING *",
        )
        .bind(id)
        .bind(expected_owner)
        .bind(update.title)
        .bind(update.description)
        .bind(address)
        .bind(city)
        .bind(state)
        .bind(zip_code)
        .bind(update.price)
        .bind(update.bedrooms)
        .bind(update.bathrooms)
        .bind(update.area)
        .bind(update.property_type)
        .bind(update.amenities)
        .bind(update.available)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match listing {
            Some(listing) => {
                let owner = self.owner_public(listing.owner_id).await?;
                Ok(Some(ListingPublic::from_row(listing, owner)))
            }
            None => Ok(None),
        }
    }

    async fn delete_listing(&self, id: Uuid, expected_owner: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(expected_owner)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_listing_images(
        &self,
        id: Uuid,
        expected_owner: Uuid,
        images: Vec<String>,
    ) -> Result<Option<Vec<String>>, StoreError> {
        let row: Option<(Vec<String>,)> = sqlx::query_as(
            "UPDATE listings SET images = $3, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 RETURNING images",
        )
        .bind(id)
        .bind(expected_owner)
        .bind(images)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(|(images,)| images))
    }

    async fn insert_appointment(
        &self,
        customer_id: Uuid,
        landlord_id: Uuid,
        new: NewAppointment,
    ) -> Result<Appointment, StoreError> {
        sqlx::query_as(
            "INSERT INTO appointments \
             (id, listing_id, customer_id, landlord_id, \"date\", \"time\", status, message) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id, listing_id, customer_id, landlord_id, \"date\", \"time\", status, \
                       message, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(new.listing_id)
        .bind(customer_id)
        .bind(landlord_id)
        .bind(new.date)
        .bind(new.time)
        .bind(AppointmentStatus::Pending)
        .bind(new.message)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        let pool = self.pool.clone();
        with_read_retry(move || {
            let pool = pool.clone();
            Box::pin(async move {
                sqlx::query_as(
                    "SELECT id, listing_id, customer_id, landlord_id, \"date\", \"time\", \
                     status, message, created_at FROM appointments WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(&pool)
                .await
                .map_err(map_sqlx_error)
            })
        })
        .await
    }

    async fn set_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, StoreError> {
        sqlx::query_as(
            "UPDATE appointments SET status = $2 WHERE id = $1 \
             RETURNING id, listing_id, customer_id, landlord_id, \"date\", \"time\", status, \
                       message, created_at",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .ok_or_else(|| StoreError::NotFound("Appointment not found".to_string()))
    }

    async fn appointment_detail(
        &self,
        id: Uuid,
    ) -> Result<Option<AppointmentDetail>, StoreError> {
        let pool = self.pool.clone();
        with_read_retry(move || {
            let pool = pool.clone();
            Box::pin(async move {
                let row: Option<AppointmentDetailRow> =
                    sqlx::query_as(&format!("{APPOINTMENT_DETAIL_SELECT} WHERE a.id = $1"))
                        .bind(id)
                        .fetch_optional(&pool)
                        .await
                        .map_err(map_sqlx_error)?;
                Ok(row.map(AppointmentDetailRow::into_detail))
            })
        })
        .await
    }

    async fn appointments_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<AppointmentDetail>, StoreError> {
        let pool = self.pool.clone();
        with_read_retry(move || {
            let pool = pool.clone();
            Box::pin(async move {
                let rows: Vec<AppointmentDetailRow> = sqlx::query_as(&format!(
                    "{APPOINTMENT_DETAIL_SELECT} WHERE a.customer_id = $1 ORDER BY a.\"date\" DESC"
                ))
                .bind(customer_id)
                .fetch_all(&pool)
                .await
                .map_err(map_sqlx_error)?;
                Ok(rows.into_iter().map(AppointmentDetailRow::into_detail).collect())
            })
        })
        .await
    }

    async fn appointments_for_landlord(
        &self,
        landlord_id: Uuid,
    ) -> Result<Vec<AppointmentDetail>, StoreError> {
        let pool = self.pool.clone();
        with_read_retry(move || {
            let pool = pool.clone();
            Box::pin(async move {
                let rows: Vec<AppointmentDetailRow> = sqlx::query_as(&format!(
                    "{APPOINTMENT_DETAIL_SELECT} WHERE a.landlord_id = $1 ORDER BY a.\"date\" DESC"
                ))
                .bind(landlord_id)
                .fetch_all(&pool)
                .await
                .map_err(map_sqlx_error)?;
                Ok(rows.into_iter().map(AppointmentDetailRow::into_detail).collect())
            })
        })
        .await
    }

    async fn insert_notification(
        &self,
        new: NewNotification,
    ) -> Result<Notification, StoreError> {
        sqlx::query_as(
            "INSERT INTO notifications \
             (id, recipient_id, sender_id, \"type\", title, message, related_listing_id, \
              related_appointment_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id, recipient_id, sender_id, \"type\", title, message, \
                       related_listing_id, related_appointment_id, \"read\", created_at",
        )
        .bind(Uuid::new_v4())
        .bind(new.recipient_id)
        .bind(new.sender_id)
        .bind(new.kind)
        .bind(new.title)
        .bind(new.message)
        .bind(new.related_listing_id)
        .bind(new.related_appointment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn notifications_for(
        &self,
        recipient_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NotificationFeedItem>, StoreError> {
        let pool = self.pool.clone();
        with_read_retry(move || {
            let pool = pool.clone();
            Box::pin(async move {
                let rows: Vec<NotificationFeedRow> = sqlx::query_as(
                    "SELECT n.id, n.recipient_id, n.sender_id, n.\"type\", n.title, n.message, \
                     n.related_listing_id, n.related_appointment_id, n.\"read\", n.created_at, \
                     s.name AS sender_name, l.title AS listing_title \
                     FROM notifications n \
                     LEFT JOIN users s ON s.id = n.sender_id \
                     LEFT JOIN listings l ON l.id = n.related_listing_id \
                     WHERE n.recipient_id = $1 \
                     ORDER BY n.created_at DESC LIMIT $2",
                )
                .bind(recipient_id)
                .bind(limit)
                .fetch_all(&pool)
                .await
                .map_err(map_sqlx_error)?;
                Ok(rows.into_iter().map(NotificationFeedRow::into_item).collect())
            })
        })
        .await
    }

    async fn unread_count(&self, recipient_id: Uuid) -> Result<i64, StoreError> {
        let pool = self.pool.clone();
        with_read_retry(move || {
            let pool = pool.clone();
            Box::pin(async move {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM notifications \
                     WHERE recipient_id = $1 AND \"read\" = FALSE",
                )
                .bind(recipient_id)
                .fetch_one(&pool)
                .await
                .map_err(map_sqlx_error)
            })
        })
        .await
    }

    async fn mark_notification_read(
        &self,
        id: Uuid,
        recipient_id: Uuid,
    ) -> Result<Option<Notification>, StoreError> {
        sqlx::query_as(
            "UPDATE notifications SET \"read\" = TRUE \
             WHERE id = $1 AND recipient_id = $2 \
             RETURNING id, recipient_id, sender_id, \"type\", title, message, \
                       related_listing_id, related_appointment_id, \"read\", created_at",
        )
        .bind(id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE notifications SET \"read\" = TRUE \
             WHERE recipient_id = $1 AND \"read\" = FALSE",
        )
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }

    async fn delete_notification(
        &self,
        id: Uuid,
        recipient_id: Uuid,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND recipient_id = $2")
            .bind(id)
            .bind(recipient_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
