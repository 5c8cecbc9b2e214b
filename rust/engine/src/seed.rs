use chrono::{TimeZone, Utc};

use crate::models::{
    CatalogEntry, Channel, Collaborator, CollaboratorRole, NotificationLevel, StorageGrant,
};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> i64 {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .map(|time| time.timestamp())
        .unwrap_or(0)
}

#[allow(clippy::too_many_arguments)]
fn video(
    id: i64,
    title: &str,
    thumbnail: &str,
    author: &str,
    role: &str,
    description: &str,
    viewed_at_epoch: i64,
    duration: &str,
    category: &str,
) -> CatalogEntry {
    CatalogEntry {
        id,
        title: title.to_string(),
        thumbnail: thumbnail.to_string(),
        author: author.to_string(),
        avatar: Some("/img/imageDashboard.jpg".to_string()),
        role: role.to_string(),
        description: description.to_string(),
        viewed_at_epoch,
        duration: duration.to_string(),
        category: category.to_string(),
        favorites: false,
        later: false,
        my_videos: false,
        group_label: String::new(),
    }
}

/// The demo catalog the host shows before any user content exists. List
/// memberships are pre-assigned so every tab has something to render.
pub fn demo_catalog() -> Vec<CatalogEntry> {
    let mut videos = vec![
        video(
            1,
            "Video de la historia de Machu Picchu",
            "/videos/php.mp4",
            "Francis Sanchez",
            "Profesor de Cultura",
            "Aprende más sobre la historia y cultura de Machu Picchu.",
            at(2025, 4, 15, 14, 30),
            "15:45",
            "Historia",
        ),
        video(
            2,
            "Explicación de la revolución Francesa",
            "https://images.yachaytube.edu.pe/revolucion-francesa.png",
            "Francis Sanchez",
            "Profesor de Cultura",
            "Conoce qué sucedió en Francia durante la revolución.",
            at(2025, 4, 15, 10, 20),
            "18:22",
            "Historia",
        ),
        video(
            3,
            "Tipos de Lenguajes de programación",
            "https://images.yachaytube.edu.pe/lenguajes.png",
            "Erick Flores",
            "Profesor de Programación",
            "Conoce qué lenguaje de programación se convertirá en tu favorito.",
            at(2025, 4, 14, 18, 45),
            "22:10",
            "Programación",
        ),
        video(
            4,
            "Ecuaciones lineales para principiantes",
            "https://images.yachaytube.edu.pe/ecuaciones.jpg",
            "María Gómez",
            "Profesora de Matemáticas",
            "Los conceptos básicos de las ecuaciones lineales, de forma práctica.",
            at(2025, 4, 13, 9, 15),
            "14:30",
            "Matemáticas",
        ),
        video(
            5,
            "Introducción a la física cuántica",
            "https://images.yachaytube.edu.pe/cuantica.png",
            "Carlos Ramírez",
            "Profesor de Física",
            "Una introducción accesible a la física cuántica.",
            at(2025, 4, 12, 20, 30),
            "24:15",
            "Ciencia",
        ),
        video(
            6,
            "Ecuaciones lineales - Introducción",
            "https://images.yachaytube.edu.pe/ecuaciones-intro.jpg",
            "EDteam",
            "Profesor de Matemáticas",
            "Introducción a las ecuaciones lineales y sus propiedades.",
            at(2025, 4, 10, 14, 30),
            "15:00",
            "Matemáticas",
        ),
        video(
            7,
            "Clasificación de ecuaciones",
            "/videos/matematica2.gif",
            "EDteam",
            "Profesor de Matemáticas",
            "Aprende a clasificar los tipos de ecuaciones matemáticas.",
            at(2025, 4, 9, 10, 20),
            "16:30",
            "Matemáticas",
        ),
        video(
            8,
            "Comprensión lectora",
            "/videos/3rNn.gif",
            "EDteam",
            "Profesor de Comunicación",
            "Técnicas para mejorar la comprensión lectora en textos académicos.",
            at(2025, 4, 8, 15, 45),
            "14:20",
            "Comunicación",
        ),
        video(
            9,
            "Redacción de ensayos",
            "/videos/7IwL.gif",
            "EDteam",
            "Profesor de Comunicación",
            "Aprende a estructurar y redactar ensayos académicos.",
            at(2025, 4, 7, 11, 30),
            "18:45",
            "Comunicación",
        ),
        video(
            10,
            "Método científico",
            "/videos/matematica4.gif",
            "EDteam",
            "Profesor de Ciencia",
            "Las etapas del método científico explicadas con ejemplos.",
            at(2025, 4, 6, 9, 0),
            "13:10",
            "Ciencia",
        ),
    ];

    for entry in &mut videos {
        match entry.id {
            1 => {
                entry.favorites = true;
                entry.group_label = "Clase de Historia".to_string();
            }
            2 => {
                entry.favorites = true;
            }
            3 => {
                entry.later = true;
            }
            4 => {
                entry.favorites = true;
                entry.group_label = "Clase de Historia".to_string();
            }
            6 | 7 => {
                entry.my_videos = true;
            }
            8 => {
                entry.later = true;
            }
            _ => {}
        }
    }
    videos
}

pub fn default_categories() -> Vec<&'static str> {
    vec![
        "Matemática",
        "Comunicación",
        "Ciencia",
        "Religión",
        "Edu. Física",
        "Programación",
        "Psicología",
    ]
}

pub fn demo_channels() -> Vec<Channel> {
    vec![Channel {
        id: 1,
        name: "Canal Principal".to_string(),
        owner: "Juan Pérez".to_string(),
        is_public: true,
        is_active: true,
        avatar: Some("/avatars/avatar1.jpg".to_string()),
        banner: Some("https://images.yachaytube.edu.pe/banner-principal.jpg".to_string()),
        subscribers: 1200,
        video_count: 45,
        description: Some("Canal educativo principal".to_string()),
        category: Some("Educación".to_string()),
        is_favorite: true,
        is_subscribed: true,
        notification_level: NotificationLevel::All,
    }]
}

pub fn demo_collaborators() -> Vec<Collaborator> {
    let roles = [
        CollaboratorRole::SuperAdmin,
        CollaboratorRole::Admin,
        CollaboratorRole::User,
    ];
    roles
        .iter()
        .enumerate()
        .map(|(index, role)| Collaborator {
            id: index as i64 + 1,
            name: "Francis Pachas Lume".to_string(),
            email: "francisLume@yachaytube.edu.pe".to_string(),
            role: *role,
            active: true,
        })
        .collect()
}

pub fn demo_storage_grants() -> Vec<StorageGrant> {
    vec![
        StorageGrant {
            user_id: "1".to_string(),
            name: "Juan Pérez".to_string(),
            email: "juan@ejemplo.com".to_string(),
            avatar_url: None,
            allocated_gb: 20,
            used_gb: 15,
        },
        StorageGrant {
            user_id: "2".to_string(),
            name: "María González".to_string(),
            email: "maria@ejemplo.com".to_string(),
            avatar_url: None,
            allocated_gb: 50,
            used_gb: 10,
        },
        StorageGrant {
            user_id: "3".to_string(),
            name: "Carlos Rodríguez".to_string(),
            email: "carlos@ejemplo.com".to_string(),
            avatar_url: None,
            allocated_gb: 30,
            used_gb: 25,
        },
    ]
}
