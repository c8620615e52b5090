use chrono::NaiveDate;
use domain::{
    BookingRepository, BookingStatus, DateRange, GuestInfo, NewBooking, NewSpecialDate,
    RepositoryError, RoomFactory, RoomRepository, RoomStatus, RoomType, SpecialDateRepository,
};
use infrastructure::{Infrastructure, InfrastructureConfig, InMemoryStorage};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn range(from: NaiveDate, to: NaiveDate) -> DateRange {
    DateRange::new(from, to).unwrap()
}

fn guest(email: &str) -> GuestInfo {
    GuestInfo {
        name: "Guest".to_string(),
        email: email.to_string(),
        phone: String::new(),
    }
}

fn new_booking(room_id: i64, stay: DateRange, email: &str) -> NewBooking {
    NewBooking {
        room_id,
        range: stay,
        guest_info: guest(email),
        price: 5000.0,
        status: BookingStatus::Pending,
    }
}

#[tokio::test]
async fn seeded_storage_lists_rooms_by_number() {
    let storage = InMemoryStorage::seeded();
    let rooms = storage.rooms().get_all().await.unwrap();

    let numbers: Vec<_> = rooms.iter().map(|room| room.room_number.as_str()).collect();
    assert_eq!(numbers, vec!["101", "102", "201", "202", "301", "401"]);
    assert!(rooms.iter().all(|room| room.status == RoomStatus::Available));
}

#[tokio::test]
async fn duplicate_room_number_is_a_conflict() {
    let storage = InMemoryStorage::seeded();
    let duplicate = RoomFactory::new().create_room(RoomType::Suite, "101");

    let err = storage.rooms().create(duplicate).await.unwrap_err();
    assert_eq!(err, RepositoryError::Conflict);
}

#[tokio::test]
async fn overlapping_active_bookings_are_rejected() {
    let storage = InMemoryStorage::seeded();
    let room = storage.rooms().get_by_number("101").await.unwrap().unwrap();
    let bookings = storage.bookings();

    let first = bookings
        .create(new_booking(room.id, range(date(2024, 5, 10), date(2024, 5, 13)), "a@x.io"))
        .await
        .unwrap();

    let overlap = bookings
        .create(new_booking(room.id, range(date(2024, 5, 12), date(2024, 5, 14)), "b@x.io"))
        .await;
    assert_eq!(overlap.unwrap_err(), RepositoryError::Conflict);

    // 退房当天可以入住
    bookings
        .create(new_booking(room.id, range(date(2024, 5, 13), date(2024, 5, 15)), "c@x.io"))
        .await
        .unwrap();

    bookings
        .update_status(first.id, BookingStatus::Cancelled)
        .await
        .unwrap();
    assert!(bookings
        .is_room_available(room.id, range(date(2024, 5, 10), date(2024, 5, 13)))
        .await
        .unwrap());
}

#[tokio::test]
async fn reviving_cancelled_booking_respects_overlap() {
    let storage = InMemoryStorage::seeded();
    let room = storage.rooms().get_by_number("201").await.unwrap().unwrap();
    let bookings = storage.bookings();
    let stay = range(date(2024, 8, 1), date(2024, 8, 4));

    let cancelled = bookings
        .create(new_booking(room.id, stay, "first@x.io"))
        .await
        .unwrap();
    bookings
        .update_status(cancelled.id, BookingStatus::Cancelled)
        .await
        .unwrap();
    bookings
        .create(new_booking(room.id, stay, "second@x.io"))
        .await
        .unwrap();

    let revived = bookings
        .update_status(cancelled.id, BookingStatus::Confirmed)
        .await;
    assert_eq!(revived.unwrap_err(), RepositoryError::Conflict);
}

#[tokio::test]
async fn available_rooms_exclude_booked_and_maintenance_rooms() {
    let storage = InMemoryStorage::seeded();
    let rooms = storage.rooms();
    let stay = range(date(2024, 6, 1), date(2024, 6, 3));

    let booked = rooms.get_by_number("101").await.unwrap().unwrap();
    storage
        .bookings()
        .create(new_booking(booked.id, stay, "guest@x.io"))
        .await
        .unwrap();
    let closed = rooms.get_by_number("102").await.unwrap().unwrap();
    rooms
        .update_status(closed.id, RoomStatus::Maintenance)
        .await
        .unwrap();

    let standard = rooms
        .get_available_by_type(RoomType::Standard, stay)
        .await
        .unwrap();
    assert!(standard.is_empty());

    let large = rooms.get_available_by_capacity(4, stay).await.unwrap();
    let numbers: Vec<_> = large.iter().map(|room| room.room_number.as_str()).collect();
    assert_eq!(numbers, vec!["301", "401"]);
}

#[tokio::test]
async fn room_with_bookings_cannot_be_deleted() {
    let storage = InMemoryStorage::seeded();
    let room = storage.rooms().get_by_number("301").await.unwrap().unwrap();
    storage
        .bookings()
        .create(new_booking(room.id, range(date(2024, 3, 1), date(2024, 3, 2)), "s@x.io"))
        .await
        .unwrap();

    let err = storage.rooms().delete(room.id).await.unwrap_err();
    assert_eq!(err, RepositoryError::Conflict);
    assert_eq!(
        storage.rooms().delete(9999).await.unwrap_err(),
        RepositoryError::NotFound
    );
}

#[tokio::test]
async fn bookings_by_email_and_with_room() {
    let storage = InMemoryStorage::seeded();
    let room = storage.rooms().get_by_number("401").await.unwrap().unwrap();
    let bookings = storage.bookings();
    bookings
        .create(new_booking(room.id, range(date(2024, 1, 5), date(2024, 1, 7)), "anna@x.io"))
        .await
        .unwrap();
    bookings
        .create(new_booking(room.id, range(date(2024, 2, 5), date(2024, 2, 7)), "boris@x.io"))
        .await
        .unwrap();

    let anna = bookings.get_by_email("anna@x.io").await.unwrap();
    assert_eq!(anna.len(), 1);
    assert_eq!(anna[0].start_date, date(2024, 1, 5));

    let joined = bookings
        .get_by_status_with_room(BookingStatus::Pending)
        .await
        .unwrap();
    assert_eq!(joined.len(), 2);
    assert!(joined.iter().all(|item| item.room.room_number == "401"));
    // 后创建的排在前面
    assert_eq!(joined[0].booking.guest_info.email, "boris@x.io");
}

#[tokio::test]
async fn special_dates_are_unique_and_filtered_by_stay() {
    let storage = InMemoryStorage::new();
    let special_dates = storage.special_dates();

    for (day, name) in [(31, "New Year's Eve"), (25, "Christmas")] {
        special_dates
            .create(NewSpecialDate {
                date: date(2024, 12, day),
                name: name.to_string(),
                coefficient: 2.0,
            })
            .await
            .unwrap();
    }
    let duplicate = special_dates
        .create(NewSpecialDate {
            date: date(2024, 12, 31),
            name: "Again".to_string(),
            coefficient: 1.5,
        })
        .await;
    assert_eq!(duplicate.unwrap_err(), RepositoryError::Conflict);

    let all = special_dates.get_all().await.unwrap();
    assert_eq!(all[0].name, "Christmas");

    // 退房日不计入
    let within = special_dates
        .get_by_date_range(range(date(2024, 12, 24), date(2024, 12, 31)))
        .await
        .unwrap();
    assert_eq!(within.len(), 1);
    assert_eq!(within[0].date, date(2024, 12, 25));
}

#[tokio::test]
async fn infrastructure_without_database_uses_memory() {
    let infrastructure = Infrastructure::connect(InfrastructureConfig::default())
        .await
        .unwrap();
    let rooms = infrastructure.room_repository.get_all().await.unwrap();
    assert_eq!(rooms.len(), 6);

    let empty = Infrastructure::connect(InfrastructureConfig {
        seed_demo_data: false,
        ..InfrastructureConfig::default()
    })
    .await
    .unwrap();
    assert!(empty.room_repository.get_all().await.unwrap().is_empty());
    assert!(empty
        .notification_type_repository
        .get_all()
        .await
        .unwrap()
        .is_empty());
}
