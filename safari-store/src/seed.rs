use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use safari_core::admin::{CampaignStatus, Comment, CommentStatus, EmailCampaign, User, UserRole};
use safari_core::Tour;
use uuid::Uuid;

fn tour(slug: &str, title: &str, location: &str, short: &str, description: &str, highlights: &[&str], price: i64, days: u32) -> Tour {
    Tour {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: title.to_string(),
        location: location.to_string(),
        description: description.to_string(),
        short_description: short.to_string(),
        highlights: highlights.iter().map(|h| h.to_string()).collect(),
        price: Decimal::from(price),
        duration_days: days,
        image: format!("/images/tours/{}.jpg", slug),
        is_active: true,
    }
}

/// Catalogue used by the in-memory backend. Mirrors the rows inserted by the
/// initial migration.
pub fn tours() -> Vec<Tour> {
    vec![
        tour(
            "masai-mara-migration",
            "Masai Mara Great Migration",
            "Masai Mara, Kenya",
            "Witness the wildebeest river crossings",
            "Follow the great migration across the Mara plains with expert guides and sundowners on the escarpment.",
            &["Mara River crossings", "Big Five game drives", "Hot air balloon safari"],
            2450,
            5,
        ),
        tour(
            "serengeti-explorer",
            "Serengeti Explorer",
            "Serengeti, Tanzania",
            "Endless plains and big cats",
            "Seven days tracking lions, cheetahs and leopards through the central Serengeti and Ngorongoro Crater.",
            &["Ngorongoro Crater descent", "Cheetah tracking", "Olduvai Gorge visit"],
            3200,
            7,
        ),
        tour(
            "bwindi-gorilla-trek",
            "Bwindi Gorilla Trek",
            "Bwindi, Uganda",
            "Face to face with mountain gorillas",
            "Trek through the Impenetrable Forest to spend an hour with a habituated mountain gorilla family.",
            &["Gorilla permit included", "Batwa community walk", "Forest birding"],
            1850,
            3,
        ),
        tour(
            "okavango-delta-mokoro",
            "Okavango Delta by Mokoro",
            "Okavango Delta, Botswana",
            "Glide through the delta channels",
            "Explore the papyrus channels of the delta by traditional dugout canoe, with walking safaris on the islands.",
            &["Mokoro excursions", "Walking safari", "Elephant herds"],
            2900,
            4,
        ),
        tour(
            "zanzibar-spice-beach",
            "Zanzibar Spice and Beach",
            "Zanzibar, Tanzania",
            "Stone Town, spice farms and white sand",
            "Unwind after safari with a guided Stone Town walk, a spice farm tour and three nights on the east coast beaches.",
            &["Stone Town heritage walk", "Spice farm tour", "Dhow sunset cruise"],
            1200,
            4,
        ),
        tour(
            "kruger-big-five",
            "Kruger Big Five Safari",
            "Kruger National Park, South Africa",
            "Classic Big Five in a private reserve",
            "Open-vehicle game drives in a private Kruger concession with night drives and bush breakfasts.",
            &["Big Five game drives", "Night drive", "Bush breakfast"],
            2100,
            4,
        ),
    ]
}

pub fn comments() -> Vec<Comment> {
    let now = Utc::now();
    vec![
        Comment {
            id: Uuid::new_v4(),
            tour_id: Some("bwindi-gorilla-trek".to_string()),
            author_name: "Amina Odhiambo".to_string(),
            author_email: "amina@example.com".to_string(),
            body: "The gorilla family was unforgettable. Guides were fantastic.".to_string(),
            status: CommentStatus::Pending,
            created_at: now - Duration::days(2),
        },
        Comment {
            id: Uuid::new_v4(),
            tour_id: Some("masai-mara-migration".to_string()),
            author_name: "Lars Jensen".to_string(),
            author_email: "lars@example.com".to_string(),
            body: "Saw three river crossings in one morning.".to_string(),
            status: CommentStatus::Approved,
            created_at: now - Duration::days(5),
        },
    ]
}

pub fn users() -> Vec<User> {
    let now = Utc::now();
    vec![
        User {
            id: Uuid::new_v4(),
            name: "Site Admin".to_string(),
            email: "admin@example.com".to_string(),
            role: UserRole::Admin,
            is_locked: false,
            password_reset_required: false,
            created_at: now - Duration::days(30),
            last_login_at: Some(now - Duration::hours(3)),
        },
        User {
            id: Uuid::new_v4(),
            name: "Content Editor".to_string(),
            email: "editor@example.com".to_string(),
            role: UserRole::Editor,
            is_locked: false,
            password_reset_required: false,
            created_at: now - Duration::days(12),
            last_login_at: None,
        },
    ]
}

pub fn campaigns() -> Vec<EmailCampaign> {
    let now = Utc::now();
    vec![EmailCampaign {
        id: Uuid::new_v4(),
        name: "Migration season".to_string(),
        subject: "The herds are moving".to_string(),
        body: "Book your Mara migration safari before July.".to_string(),
        status: CampaignStatus::Draft,
        scheduled_at: None,
        created_at: now - Duration::days(1),
        updated_at: now - Duration::days(1),
    }]
}
