pub const GREETING: &str =
    "Hi! I'm your Evadoom assistant. How can I help you with EV charging today?";

pub const DEFAULT_RESPONSE: &str = "Thanks for your message! I'm here to help with all your EV charging needs. Try asking me about:\n• Nearby charging stations\n• Pricing information\n• How to use our features\n• Account support\n\nWhat would you like to know? 😊";

struct Rule {
    keywords: &'static [&'static str],
    response: &'static str,
}

// first match wins, so order matters
const RULES: &[Rule] = &[
    Rule {
        keywords: &["charging", "station", "find", "map"],
        response: "🗺️ I can help you find nearby charging stations! Use our interactive map to see real-time availability, or check out peer-to-peer charging for better rates. Would you like me to guide you to the map section?",
    },
    Rule {
        keywords: &["price", "cost", "rate"],
        response: "💰 Charging prices vary by location and speed:\n• Fast chargers: $0.35-0.45/kWh\n• Normal chargers: $0.20-0.30/kWh\n• Peer-to-peer: $0.18-0.25/kWh\n\nPeer charging often offers the best rates!",
    },
    Rule {
        keywords: &["rental", "generator", "portable"],
        response: "⚡ Our portable EV generator rental service provides charging anywhere you need it! Perfect for:\n• Remote locations\n• Emergency charging\n• Events and camping\n\nVisit our Generator Rental page to see available options and pricing.",
    },
    Rule {
        keywords: &["peer", "p2p", "community"],
        response: "👥 Peer-to-peer charging connects you with nearby EV owners who share their home chargers. Benefits:\n• Lower rates than commercial stations\n• More convenient locations\n• Support your local community\n\nCheck out our Peer Charging section to get started!",
    },
    Rule {
        keywords: &["evadoom", "about", "platform"],
        response: "🚗 Evadoom is the future of EV charging! We offer:\n• Real-time charging station finder\n• Peer-to-peer charging network\n• Portable generator rentals\n• 24/7 support\n\nPowering Tomorrow, Together! How can I help you get started?",
    },
    Rule {
        keywords: &["login", "signup", "account"],
        response: "🔐 Need help with your account? You can:\n• Sign up with email, Google, or Apple ID\n• Reset your password using 'Forgot Password'\n• Update your profile in the Profile section\n\nIs there a specific issue you're experiencing?",
    },
    Rule {
        keywords: &["navigation", "directions", "route"],
        response: "🧭 Our integrated Google Maps provides turn-by-turn navigation to charging stations! Simply:\n1. Find a station on the map\n2. Click 'Navigate'\n3. Follow GPS directions\n\nYou can also reserve stations in advance to guarantee availability.",
    },
    Rule {
        keywords: &["help", "support", "?"],
        response: "🤖 I'm your Evadoom AI assistant! I can help with:\n• Finding charging stations\n• Explaining pricing and features\n• Navigation and reservations\n• Account and login issues\n• Generator rentals\n• Peer-to-peer charging\n\nJust ask me anything about EV charging!",
    },
];

pub fn respond(message: &str) -> &'static str {
    let lowered = message.to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map_or(DEFAULT_RESPONSE, |rule| rule.response)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_RESPONSE, RULES, respond};

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(respond("Where is the nearest STATION"), RULES[0].response);
        assert_eq!(respond("what does it COST"), RULES[1].response);
    }

    #[test]
    fn earlier_rules_take_precedence() {
        // "charging" (rule 0) beats "price" (rule 1) and "?" (rule 7)
        assert_eq!(respond("charging price?"), RULES[0].response);
        // "rental" beats "help"
        assert_eq!(respond("help with a generator rental"), RULES[2].response);
        // "support" only matches the help rule
        assert_eq!(respond("I need support"), RULES[7].response);
    }

    #[test]
    fn substring_matches_inside_longer_words() {
        // "separate" contains "rate"
        assert_eq!(respond("separate"), RULES[1].response);
        assert_eq!(respond("tell me about it"), RULES[4].response);
    }

    #[test]
    fn unknown_text_gets_default_response() {
        assert_eq!(respond("hello there"), DEFAULT_RESPONSE);
        assert_eq!(respond(""), DEFAULT_RESPONSE);
    }

    #[test]
    fn identical_input_yields_identical_output() {
        for input in ["route planning", "P2P", "account locked", "random words"] {
            assert_eq!(respond(input), respond(input));
            assert_eq!(respond(input), respond(&input.to_uppercase()));
        }
    }
}
