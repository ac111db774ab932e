use chrono::{DateTime, Utc};

/// Relative age label shown on request and offer cards.
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - created_at).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{} дн. назад", days)
    } else if hours > 0 {
        format!("{} ч. назад", hours)
    } else if minutes > 0 {
        format!("{} мин. назад", minutes)
    } else {
        "только что".to_string()
    }
}
