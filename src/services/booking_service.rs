use crate::{
    database::{DocumentStore, BOOKINGS, USERS},
    models::{Booking, BookingStatus, CreateBookingRequest, Record, User},
    services::{lab_test_service, records},
    utils::{pdf, AppError},
};
use mongodb::bson::{doc, oid::ObjectId, to_bson};

const ENTITY: &str = "Booking";

/// A rendered test result ready to be served as a download.
pub struct ResultReport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Books a test. Name, price and date are copied from the test now and are
/// not kept in sync if the test changes later.
pub async fn create_booking(
    store: &dyn DocumentStore,
    request: CreateBookingRequest,
) -> Result<Record<Booking>, AppError> {
    let test_id = ObjectId::parse_str(&request.test_id)
        .map_err(|_| AppError::InvalidRequest(format!("Invalid test id '{}'", request.test_id)))?;
    let test = lab_test_service::get_test(store, test_id).await?.data;

    let date = request
        .date
        .or(test.date)
        .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());

    let booking = Booking {
        user_id: request.user_id,
        email: request.email,
        test_id: request.test_id,
        test_name: test.name,
        price: test.price,
        date,
        status: BookingStatus::Pending,
        test_result_url: None,
    };

    records::create(store, BOOKINGS, booking).await
}

/// All bookings, or only those of `email` when given.
pub async fn list_bookings(
    store: &dyn DocumentStore,
    email: Option<&str>,
) -> Result<Vec<Record<Booking>>, AppError> {
    let filter = match email {
        Some(email) => doc! { "email": email },
        None => doc! {},
    };
    records::list(store, BOOKINGS, filter).await
}

pub async fn get_booking(store: &dyn DocumentStore, id: ObjectId) -> Result<Record<Booking>, AppError> {
    records::get(store, BOOKINGS, id, ENTITY).await
}

pub async fn update_status(
    store: &dyn DocumentStore,
    id: ObjectId,
    status: BookingStatus,
) -> Result<Record<Booking>, AppError> {
    let status = to_bson(&status)?;
    records::update(store, BOOKINGS, id, doc! { "status": status }, ENTITY).await
}

/// Attaches the result document and marks the booking delivered.
pub async fn submit_result(
    store: &dyn DocumentStore,
    id: ObjectId,
    test_result_url: String,
) -> Result<Record<Booking>, AppError> {
    if test_result_url.trim().is_empty() {
        return Err(AppError::InvalidRequest("testResultUrl is required".to_string()));
    }

    let fields = doc! {
        "testResultUrl": test_result_url,
        "status": to_bson(&BookingStatus::Delivered)?,
    };
    records::update(store, BOOKINGS, id, fields, ENTITY).await
}

pub async fn delete_booking(store: &dyn DocumentStore, id: ObjectId) -> Result<(), AppError> {
    records::delete(store, BOOKINGS, id, ENTITY).await
}

/// Renders the PDF result sheet of a booking.
pub async fn result_report(store: &dyn DocumentStore, id: ObjectId) -> Result<ResultReport, AppError> {
    let booking = records::get::<Booking>(store, BOOKINGS, id, "Test result").await?.data;

    let user_id = ObjectId::parse_str(&booking.user_id)
        .map_err(|_| AppError::NotFound("User".to_string()))?;
    let user = records::get::<User>(store, USERS, user_id, "User").await?.data;

    let user_name = user.name.unwrap_or(user.email);
    let bytes = pdf::render_test_result(&user_name, &booking)?;

    Ok(ResultReport {
        file_name: format!("{}_test_result.pdf", user_name),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{InMemoryStore, TESTS};
    use crate::models::{LabTest, Role, UserStatus};

    async fn seed_test(store: &InMemoryStore, date: Option<&str>) -> String {
        let test = LabTest {
            name: "Thyroid profile".to_string(),
            price: 42.5,
            description: None,
            image: None,
            date: date.map(String::from),
            slots: None,
        };
        records::create(store, TESTS, test).await.unwrap().id
    }

    async fn seed_user(store: &InMemoryStore) -> String {
        let user = User {
            email: "a@x.com".to_string(),
            name: Some("Ana Rahman".to_string()),
            role: Role::User,
            status: UserStatus::Active,
            district: None,
            upazila: None,
            blood_group: None,
            photo_url: None,
            tests: vec![],
        };
        records::create(store, USERS, user).await.unwrap().id
    }

    fn request(user_id: &str, test_id: &str, date: Option<&str>) -> CreateBookingRequest {
        CreateBookingRequest {
            user_id: user_id.to_string(),
            email: "a@x.com".to_string(),
            test_id: test_id.to_string(),
            date: date.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_booking_copies_test_fields() {
        let store = InMemoryStore::new();
        let test_id = seed_test(&store, Some("2026-11-02")).await;

        let booking = create_booking(&store, request("u1", &test_id, None)).await.unwrap();
        assert_eq!(booking.data.test_name, "Thyroid profile");
        assert_eq!(booking.data.price, 42.5);
        assert_eq!(booking.data.date, "2026-11-02");
        assert_eq!(booking.data.status, BookingStatus::Pending);

        // Later price changes do not reach existing bookings.
        let test_key = ObjectId::parse_str(&test_id).unwrap();
        store.update_fields(TESTS, test_key, doc! { "price": 99.0 }).await.unwrap();
        let id = ObjectId::parse_str(&booking.id).unwrap();
        assert_eq!(get_booking(&store, id).await.unwrap().data.price, 42.5);
    }

    #[tokio::test]
    async fn test_booking_unknown_test() {
        let store = InMemoryStore::new();
        let result = create_booking(&store, request("u1", &ObjectId::new().to_hex(), None)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let result = create_booking(&store, request("u1", "not-an-id", None)).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_list_filters_by_email() {
        let store = InMemoryStore::new();
        let test_id = seed_test(&store, None).await;
        create_booking(&store, request("u1", &test_id, Some("2026-12-01"))).await.unwrap();
        let mut other = request("u2", &test_id, None);
        other.email = "b@x.com".to_string();
        create_booking(&store, other).await.unwrap();

        assert_eq!(list_bookings(&store, None).await.unwrap().len(), 2);
        let mine = list_bookings(&store, Some("a@x.com")).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].data.date, "2026-12-01");
    }

    #[tokio::test]
    async fn test_delete_missing_booking_leaves_collection_unchanged() {
        let store = InMemoryStore::new();
        let test_id = seed_test(&store, None).await;
        create_booking(&store, request("u1", &test_id, None)).await.unwrap();

        let result = delete_booking(&store, ObjectId::new()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(list_bookings(&store, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_result_marks_delivered() {
        let store = InMemoryStore::new();
        let test_id = seed_test(&store, None).await;
        let booking = create_booking(&store, request("u1", &test_id, None)).await.unwrap();
        let id = ObjectId::parse_str(&booking.id).unwrap();

        let updated = submit_result(&store, id, "https://files.example/r1.pdf".to_string())
            .await
            .unwrap();

        assert_eq!(updated.data.status, BookingStatus::Delivered);
        assert_eq!(updated.data.test_result_url.as_deref(), Some("https://files.example/r1.pdf"));
    }

    #[tokio::test]
    async fn test_result_report() {
        let store = InMemoryStore::new();
        let test_id = seed_test(&store, Some("2026-11-02")).await;
        let user_id = seed_user(&store).await;
        let booking = create_booking(&store, request(&user_id, &test_id, None)).await.unwrap();
        let id = ObjectId::parse_str(&booking.id).unwrap();

        let report = result_report(&store, id).await.unwrap();

        assert_eq!(report.file_name, "Ana Rahman_test_result.pdf");
        assert!(report.bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_result_report_for_deleted_user() {
        let store = InMemoryStore::new();
        let test_id = seed_test(&store, None).await;
        let booking = create_booking(&store, request(&ObjectId::new().to_hex(), &test_id, None))
            .await
            .unwrap();
        let id = ObjectId::parse_str(&booking.id).unwrap();

        let result = result_report(&store, id).await;
        assert!(matches!(result, Err(AppError::NotFound(ref entity)) if entity == "User"));

        let missing = result_report(&store, ObjectId::new()).await;
        assert!(matches!(missing, Err(AppError::NotFound(ref entity)) if entity == "Test result"));
    }
}
