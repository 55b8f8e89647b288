//! Text rendering of application snapshots.

use std::fmt::Write;

use lib_utils::format_clock;

use crate::app::{AppState, Phase};

/// Render the full view for one snapshot.
pub fn render(state: &AppState) -> String {
    let mut out = String::new();

    match state.phase {
        Phase::Disconnected => {
            out.push_str("Not connected. Type `connect` to link your wallet.\n");
        }
        Phase::Connecting => {
            out.push_str("Connecting to wallet...\n");
        }
        Phase::Connected | Phase::Voting => render_session(state, &mut out),
    }

    if let Some(error) = &state.error {
        let _ = writeln!(out, "Error: {}", error);
    }
    out
}

fn render_session(state: &AppState, out: &mut String) {
    let account = state.short_account().unwrap_or_default();
    match state.chain_id {
        Some(chain_id) => {
            let _ = writeln!(out, "Account: {} (chain {})", account, chain_id);
        }
        None => {
            let _ = writeln!(out, "Account: {}", account);
        }
    }
    let _ = writeln!(out, "Votes remaining: {}/{}", state.remaining_votes(), state.vote_cap);

    if state.phase == Phase::Voting {
        out.push_str("Vote pending confirmation...\n");
    }

    if state.candidates.is_empty() {
        out.push_str("  (no candidates loaded)\n");
    }
    for candidate in &state.candidates {
        let action = if state.votes_exhausted() {
            "no votes left".to_string()
        } else if state.can_vote() {
            format!("vote {}", candidate.index)
        } else {
            "busy".to_string()
        };
        let _ = writeln!(
            out,
            "  [{}] {:<20} {:>4} votes   ({})",
            candidate.index, candidate.name, candidate.vote_count, action
        );
    }

    let _ = writeln!(out, "Winner: {}", state.winner_text());
    if let Some(at) = state.last_refreshed {
        let _ = writeln!(out, "Last refresh: {} UTC", format_clock(at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::dto::{Candidate, Winner};

    fn connected_state() -> AppState {
        let mut state = AppState::new(5);
        state.phase = Phase::Connected;
        state.account = Some("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string());
        state.chain_id = Some(31337);
        state.session_id = Some(1);
        state.candidates = vec![
            Candidate::new(0, "Tarik Tambang", 2),
            Candidate::new(1, "Balap Karung", 0),
            Candidate::new(2, "Panjat Pinang", 1),
        ];
        state.vote_count = 3;
        state.winner = Winner::new("Tarik Tambang", 2);
        state
    }

    #[test]
    fn test_render_disconnected() {
        let view = render(&AppState::new(5));
        assert!(view.starts_with("Not connected."));
        assert!(!view.contains("Error:"));
    }

    #[test]
    fn test_render_connected() {
        let view = render(&connected_state());
        assert!(view.contains("Account: 0xf39F...2266 (chain 31337)"));
        assert!(view.contains("Votes remaining: 2/5"));
        assert!(view.contains("(vote 1)"));
        assert!(view.contains("Winner: Tarik Tambang with 2 votes"));
    }

    #[test]
    fn test_render_exhausted_hides_vote_action() {
        let mut state = connected_state();
        state.vote_count = 5;
        let view = render(&state);
        assert_eq!(view.matches("(no votes left)").count(), 3);
        assert!(!view.contains("(vote "));
        assert!(view.contains("Votes remaining: 0/5"));
    }

    #[test]
    fn test_render_voting_and_error() {
        let mut state = connected_state();
        state.phase = Phase::Voting;
        state.loading = true;
        state.error = Some("Failed to cast vote: Transaction reverted: x".to_string());
        let view = render(&state);
        assert!(view.contains("Vote pending confirmation"));
        assert!(view.contains("(busy)"));
        assert!(view.ends_with("Error: Failed to cast vote: Transaction reverted: x\n"));
    }
}
