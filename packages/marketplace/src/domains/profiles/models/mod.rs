mod profile;

pub use profile::{Profile, ProfileForm, ProfileUpdate, PLACEHOLDER_NAME};
