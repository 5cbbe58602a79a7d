//! Canned branding answers served when the completion API is out of quota.
//!
//! The prompt is matched case-insensitively against keyword groups in a fixed
//! priority order; the first group with a hit wins.

/// The subject a prompt is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Palette,
    Logo,
    Messaging,
    Strategy,
    General,
}

const RULES: &[(Topic, &[&str])] = &[
    (Topic::Palette, &["color", "palette"]),
    (Topic::Logo, &["logo", "design"]),
    (Topic::Messaging, &["message", "slogan", "tagline"]),
    (Topic::Strategy, &["strategy", "position"]),
];

impl Topic {
    pub fn classify(prompt: &str) -> Topic {
        let prompt = prompt.to_lowercase();
        RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| prompt.contains(k)))
            .map_or(Topic::General, |(topic, _)| *topic)
    }

    pub fn answer(self) -> &'static str {
        match self {
            Topic::Palette => PALETTE,
            Topic::Logo => LOGO,
            Topic::Messaging => MESSAGING,
            Topic::Strategy => STRATEGY,
            Topic::General => GENERAL,
        }
    }
}

/// The local answer for `prompt`.
pub fn respond(prompt: &str) -> String {
    Topic::classify(prompt).answer().to_string()
}

const PALETTE: &str = "\
For a brand that reads as both trustworthy and distinctive, try this palette:

• Primary: #3A86FF (Blue) for trust and reliability
• Secondary: #FF006E (Magenta) for energy and creativity
• Accent: #FFBE0B (Yellow) for warmth and optimism
• Neutral: #8D99AE (Gray) for balance and calm

The blue carries credibility, the magenta gives you a recognizable edge, and the \
neutral keeps layouts from feeling loud.";

const LOGO: &str = "\
A strong logo usually starts minimal. Focus on:

• Mark: one simple geometric symbol tied to what you offer
• Typography: a clean sans-serif such as Montserrat or Poppins
• Spacing: generous whitespace so the mark survives any layout
• Scalability: test it as a favicon and on a billboard

Make sure it works in full color and in a single color, and that it stays \
recognizable at small sizes.";

const MESSAGING: &str = "\
Good brand messaging rests on a few principles:

• Value proposition: \"Making [industry] simpler with smarter solutions\"
• Tone: confident and approachable, expert without talking down
• Message framework:
  - name the customer's problem
  - show what makes your solution different
  - stress the emotional payoff
  - end with a clear call to action

Keep coming back to the pain you remove for customers and how that sets you \
apart from competitors.";

const STRATEGY: &str = "\
A solid starting point for your brand strategy:

• Market position: where quality meets innovation
• Personality: professional, forward-looking, customer-centric
• Core values: excellence, integrity, innovation, responsiveness
• Differentiation: lead with your most specific feature or approach

This builds credibility and separates you from competitors that only compete \
on price.";

const GENERAL: &str = "\
Happy to help with your brand. Which area would you like to focus on?

• Brand Strategy & Positioning
• Visual Identity (Logo, Colors, Typography)
• Messaging & Tone of Voice
• Customer Perception & Experience

The more you share about your business, audience and goals, the more specific \
the advice can be.";
