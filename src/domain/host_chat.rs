use rand::Rng;

use crate::domain::peer_charging::PeerCharger;

pub const HOST_NOT_FOUND: &str = "This user is not available to chat.";

pub fn welcome_message(host: &PeerCharger) -> String {
    format!(
        "Hi! I'm {} Welcome to my charging station! I have a {} connector available at {}. Feel free to ask me anything about availability or amenities!",
        host.name,
        host.charger_type.label(),
        host.price
    )
}

pub fn contextual_replies(host: &PeerCharger) -> [String; 5] {
    let availability = if host.available {
        "available now"
    } else {
        "currently busy but should be free soon"
    };
    let amenities = if host.amenities.is_empty() {
        "Let me know what you need!".to_string()
    } else {
        format!(
            "I have {} available at my location.",
            host.amenities.join(", ")
        )
    };

    [
        format!(
            "Thanks for your message! My {} station is {availability}.",
            host.charger_type.label()
        ),
        format!(
            "Sure thing! I'm usually free {}. My rate is {} - does that work for you?",
            host.response_time, host.price
        ),
        format!("Great question! {amenities}"),
        format!(
            "I'm located about {} from you. The setup is {}",
            host.distance,
            host.description.to_lowercase()
        ),
        format!(
            "Let me check my availability and get back to you! I usually respond within {}.",
            host.response_time
        ),
    ]
}

/// Picks one of the contextual replies at random.
pub fn host_reply<R: Rng + ?Sized>(host: &PeerCharger, rng: &mut R) -> String {
    let mut replies = contextual_replies(host);
    let index = rng.random_range(0..replies.len());
    std::mem::take(&mut replies[index])
}
