//! Counter-offer message templates.
//!
//! Messages firm up as the negotiation progresses: round 1 opens politely,
//! round 2 softens toward agreement, and round 3 onward is final.
//! [`render`] is deterministic so engine output is reproducible;
//! [`render_random`] varies the wording for presentation layers.

use rand::Rng;

/// Phrasing bucket for a negotiation round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterTone {
    /// First round.
    Opening,
    /// Second round.
    Softening,
    /// Third round and later.
    Final,
}

impl CounterTone {
    /// Returns the tone for a round (rounds below 1 are treated as 1).
    #[must_use]
    pub const fn for_round(round: u32) -> Self {
        match round {
            0 | 1 => Self::Opening,
            2 => Self::Softening,
            _ => Self::Final,
        }
    }
}

/// Number of phrasings per tone.
pub const VARIANTS: usize = 3;

/// Returns the message body for a tone and variant (wrapping past [`VARIANTS`]).
#[must_use]
pub fn template(tone: CounterTone, variant: usize, rate: f64) -> String {
    match (tone, variant % VARIANTS) {
        (CounterTone::Opening, 0) => format!("Thanks for the offer. I can do ${rate}/hr."),
        (CounterTone::Opening, 1) => format!("I appreciate it. How about ${rate}/hr?"),
        (CounterTone::Opening, _) => format!("Can we meet at ${rate}/hr?"),
        (CounterTone::Softening, 0) => format!("Getting closer. ${rate}/hr works better for me."),
        (CounterTone::Softening, 1) => format!("Almost there. Can you do ${rate}/hr?"),
        (CounterTone::Softening, _) => format!("Let's split the difference at ${rate}/hr."),
        (CounterTone::Final, 0) => {
            format!("Final offer: ${rate}/hr. That's my bottom line.")
        }
        (CounterTone::Final, 1) => format!("Best I can do is ${rate}/hr."),
        (CounterTone::Final, _) => format!("This is as low as I can go: ${rate}/hr."),
    }
}

/// Renders the first phrasing for `round`, suffixed with the round counter.
#[must_use]
pub fn render(round: u32, max_rounds: u32, rate: f64) -> String {
    with_round_suffix(template(CounterTone::for_round(round), 0, rate), round, max_rounds)
}

/// Renders a randomly chosen phrasing for `round`.
#[must_use]
pub fn render_random<R: Rng + ?Sized>(round: u32, max_rounds: u32, rate: f64, rng: &mut R) -> String {
    let variant = rng.gen_range(0..VARIANTS);
    with_round_suffix(
        template(CounterTone::for_round(round), variant, rate),
        round,
        max_rounds,
    )
}

fn with_round_suffix(body: String, round: u32, max_rounds: u32) -> String {
    format!("{body} (Round {round}/{max_rounds})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use test_case::test_case;

    #[test_case(0 => CounterTone::Opening)]
    #[test_case(1 => CounterTone::Opening)]
    #[test_case(2 => CounterTone::Softening)]
    #[test_case(3 => CounterTone::Final)]
    #[test_case(7 => CounterTone::Final)]
    fn tone_for_round(round: u32) -> CounterTone {
        CounterTone::for_round(round)
    }

    #[test]
    fn render_is_deterministic() {
        assert_eq!(
            render(2, 3, 90.0),
            "Getting closer. $90/hr works better for me. (Round 2/3)"
        );
        assert_eq!(render(2, 3, 90.0), render(2, 3, 90.0));
        assert_eq!(
            render(3, 3, 85.0),
            "Final offer: $85/hr. That's my bottom line. (Round 3/3)"
        );
    }

    #[test]
    fn variants_wrap() {
        assert_eq!(
            template(CounterTone::Opening, VARIANTS, 50.0),
            template(CounterTone::Opening, 0, 50.0)
        );
    }

    #[test]
    fn random_render_uses_a_known_phrasing() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let message = render_random(1, 3, 75.0, &mut rng);
            assert!(message.ends_with(" (Round 1/3)"));
            assert!(message.contains("$75/hr"));
            let known = (0..VARIANTS).any(|v| {
                message.starts_with(&template(CounterTone::Opening, v, 75.0))
            });
            assert!(known, "unexpected message: {message}");
        }
    }
}
