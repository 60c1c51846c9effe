//! Domain models for the Atelier API.

pub mod artist;
pub mod artwork;
pub mod media;
pub mod order;
pub mod user;

pub use artist::{Artist, NotificationPreferences};
pub use artwork::Artwork;
pub use media::MediaFile;
pub use order::{Order, OrderItem};
pub use user::User;
