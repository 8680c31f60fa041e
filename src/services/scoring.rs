use crate::db::Db;
use crate::error::AppError;
use crate::models::bracket::{Bracket, Match, MatchStatus, ScoreSubmission};
use crate::services::{bracket, ticket};
use crate::validation;
use chrono::Utc;

/// Records a participant's score, settles the match once both scores are in
/// and seats the winner in the next round.
///
/// Load, mutate and save run in a single store transaction and the save is
/// checked against the version that was loaded, so two submissions for
/// different matches of the same competition cannot overwrite each other.
/// The ticket stays valid after a successful submission.
pub fn submit_score(db: &Db, req: ScoreSubmission) -> Result<Match, AppError> {
    validation::validate_id("userId", &req.user_id)?;
    validation::validate_id("matchId", &req.match_id)?;
    validation::validate_score(req.score)?;

    let now = Utc::now();
    let ticket_code = validation::normalize_code(&req.ticket_code);

    let updated = db.transaction(|tx| -> Result<Match, AppError> {
        if !ticket::check_ticket(tx, &ticket_code, &req.competition_id, now)? {
            log::warn!(
                "Rejected score from {} for {}/{}: invalid ticket",
                req.user_id,
                req.competition_id,
                req.match_id
            );
            return Err(AppError::InvalidTicket);
        }

        let (mut bracket, version) = bracket::load_bracket(tx, &req.competition_id)?;

        let (round_index, target) = bracket::find_match_mut(&mut bracket, &req.match_id)
            .ok_or_else(|| AppError::MatchNotFound(req.match_id.clone()))?;
        record_score(target, &req.user_id, req.score);
        let updated = target.clone();

        if updated.status == MatchStatus::Completed {
            match &updated.winner {
                Some(winner) => advance_winner(&mut bracket, round_index, winner, &ticket_code),
                None => log::info!(
                    "Match {} in {} tied, needs manual resolution",
                    updated.match_id,
                    req.competition_id
                ),
            }
        }

        bracket::save_bracket(tx, &req.competition_id, &bracket, version)?;
        Ok(updated)
    })?;

    log::debug!(
        "Recorded {} for {} in {}/{} ({:?})",
        req.score,
        req.user_id,
        req.competition_id,
        req.match_id,
        updated.status
    );

    Ok(updated)
}

fn record_score(m: &mut Match, player: &str, score: f64) {
    m.scores.insert(player.to_string(), Some(score));

    let outcome = match m.players.as_slice() {
        [Some(p1), Some(p2), ..] => match (m.score_of(p1), m.score_of(p2)) {
            (Some(s1), Some(s2)) if s1 > s2 => Some(Some(p1.clone())),
            (Some(s1), Some(s2)) if s2 > s1 => Some(Some(p2.clone())),
            (Some(_), Some(_)) => Some(None),
            _ => None,
        },
        _ => None,
    };

    match outcome {
        Some(winner) => {
            m.winner = winner;
            m.status = MatchStatus::Completed;
        }
        None => {
            m.winner = None;
            m.status = MatchStatus::Live;
        }
    }
}

/// Seats `winner` in the first match of the following round with a free slot
/// and hands over the ticket code it reported with.
fn advance_winner(bracket: &mut Bracket, round_index: usize, winner: &str, ticket_code: &str) {
    let Some(next_round) = bracket.rounds.get_mut(round_index + 1) else {
        log::info!("{} won the final", winner);
        return;
    };

    if next_round.matches.iter().any(|m| m.is_seated(winner)) {
        log::debug!(
            "{} already seated in round {}",
            winner,
            next_round.round_number
        );
        return;
    }

    match next_round.matches.iter_mut().find(|m| m.has_open_slot()) {
        Some(next) => {
            next.seat(winner);
            next.ticket_codes
                .insert(winner.to_string(), ticket_code.to_string());
            log::info!(
                "{} advanced to {} (round {})",
                winner,
                next.match_id,
                next_round.round_number
            );
        }
        None => log::warn!(
            "No open slot for {} in round {}",
            winner,
            next_round.round_number
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use std::sync::Arc;
    use std::thread;

    fn submit(
        db: &Db,
        user_id: &str,
        match_id: &str,
        code: &str,
        score: f64,
    ) -> Result<Match, AppError> {
        submit_score(
            db,
            ScoreSubmission {
                user_id: user_id.into(),
                competition_id: "compA".into(),
                match_id: match_id.into(),
                ticket_code: code.into(),
                score,
            },
        )
    }

    fn stored_bracket(db: &Db) -> Bracket {
        db.with_conn(|conn| Ok(bracket::load_bracket(conn, "compA").unwrap().0))
            .unwrap()
    }

    fn setup() -> (Db, String, String) {
        let db = Db::open_in_memory().unwrap();
        fixtures::seed_competition(&db, "compA", "cod", None);
        let c1 = fixtures::ticket_code(&db, "user1", "compA");
        let c2 = fixtures::ticket_code(&db, "user2", "compA");
        (db, c1, c2)
    }

    #[test]
    fn test_higher_score_wins() {
        let (db, c1, c2) = setup();
        submit(&db, "user1", "R1M1", &c1, 25.0).unwrap();
        let m = submit(&db, "user2", "R1M1", &c2, 18.0).unwrap();

        assert_eq!(m.status, MatchStatus::Completed);
        assert_eq!(m.winner.as_deref(), Some("user1"));
        assert_eq!(m.score_of("user1"), Some(25.0));
        assert_eq!(m.score_of("user2"), Some(18.0));
    }

    #[test]
    fn test_tie_completes_without_winner() {
        let (db, c1, c2) = setup();
        submit(&db, "user1", "R1M1", &c1, 20.0).unwrap();
        let m = submit(&db, "user2", "R1M1", &c2, 20.0).unwrap();

        assert_eq!(m.status, MatchStatus::Completed);
        assert_eq!(m.winner, None);

        let stored = stored_bracket(&db);
        assert!(stored.rounds[1].matches[0].players.is_empty());
    }

    #[test]
    fn test_single_score_goes_live() {
        let (db, c1, _) = setup();
        let m = submit(&db, "user1", "R1M1", &c1, 25.0).unwrap();
        assert_eq!(m.status, MatchStatus::Live);
        assert_eq!(m.winner, None);
    }

    #[test]
    fn test_winner_advances_with_ticket_code() {
        let (db, c1, c2) = setup();
        submit(&db, "user1", "R1M1", &c1, 25.0).unwrap();
        submit(&db, "user2", "R1M1", &c2, 18.0).unwrap();

        let stored = stored_bracket(&db);
        let next = &stored.rounds[1].matches[0];
        assert_eq!(next.players, vec![Some("user1".to_string())]);
        // Winner carries the ticket of the submission that settled the match
        assert_eq!(next.ticket_codes.get("user1"), Some(&c2));
    }

    #[test]
    fn test_second_winner_fills_next_slot() {
        let (db, c1, c2) = setup();
        let c3 = fixtures::ticket_code(&db, "user3", "compA");
        let c4 = fixtures::ticket_code(&db, "user4", "compA");

        submit(&db, "user1", "R1M1", &c1, 25.0).unwrap();
        submit(&db, "user2", "R1M1", &c2, 18.0).unwrap();
        submit(&db, "user3", "R1M2", &c3, 3.0).unwrap();
        submit(&db, "user4", "R1M2", &c4, 7.0).unwrap();

        let stored = stored_bracket(&db);
        assert_eq!(
            stored.rounds[1].matches[0].players,
            vec![Some("user1".to_string()), Some("user4".to_string())]
        );
    }

    #[test]
    fn test_null_slot_is_filled_before_appending() {
        let db = Db::open_in_memory().unwrap();
        let mut bracket = fixtures::two_round_bracket();
        bracket.rounds[1].matches =
            vec![fixtures::pending_match("R2M1", &[None, Some("user9")])];
        fixtures::put_bracket(&db, "compA", &bracket);
        let c1 = fixtures::ticket_code(&db, "user1", "compA");
        let c2 = fixtures::ticket_code(&db, "user2", "compA");

        submit(&db, "user1", "R1M1", &c1, 1.0).unwrap();
        submit(&db, "user2", "R1M1", &c2, 2.0).unwrap();

        let stored = stored_bracket(&db);
        assert_eq!(
            stored.rounds[1].matches[0].players,
            vec![Some("user2".to_string()), Some("user9".to_string())]
        );
    }

    #[test]
    fn test_resubmission_does_not_seat_winner_twice() {
        let (db, c1, c2) = setup();
        submit(&db, "user1", "R1M1", &c1, 25.0).unwrap();
        submit(&db, "user2", "R1M1", &c2, 18.0).unwrap();
        let m = submit(&db, "user2", "R1M1", &c2, 19.0).unwrap();

        assert_eq!(m.winner.as_deref(), Some("user1"));
        let stored = stored_bracket(&db);
        assert_eq!(stored.rounds[1].matches[0].players.len(), 1);
    }

    #[test]
    fn test_flipped_result_seats_new_winner_beside_old() {
        let (db, c1, c2) = setup();
        submit(&db, "user1", "R1M1", &c1, 25.0).unwrap();
        submit(&db, "user2", "R1M1", &c2, 18.0).unwrap();
        let m = submit(&db, "user2", "R1M1", &c2, 30.0).unwrap();
        assert_eq!(m.winner.as_deref(), Some("user2"));

        // The earlier winner is not unseated; that needs manual correction
        let next = &stored_bracket(&db).rounds[1].matches[0];
        assert_eq!(
            next.players,
            vec![Some("user1".to_string()), Some("user2".to_string())]
        );
        assert_eq!(next.ticket_codes.get("user2"), Some(&c2));
    }

    #[test]
    fn test_final_has_no_advancement() {
        let (db, c1, c2) = setup();
        let mut bracket = fixtures::two_round_bracket();
        bracket.rounds[1].matches =
            vec![fixtures::pending_match("R2M1", &[Some("user1"), Some("user2")])];
        fixtures::put_bracket(&db, "compA", &bracket);

        submit(&db, "user1", "R2M1", &c1, 10.0).unwrap();
        let m = submit(&db, "user2", "R2M1", &c2, 12.0).unwrap();

        assert_eq!(m.winner.as_deref(), Some("user2"));
        assert_eq!(stored_bracket(&db).rounds.len(), 2);
    }

    #[test]
    fn test_ticket_is_reusable_after_submission() {
        let (db, c1, _) = setup();
        submit(&db, "user1", "R1M1", &c1, 10.0).unwrap();
        assert!(ticket::validate_ticket(&db, &c1, "compA").unwrap());
        let m = submit(&db, "user1", "R1M1", &c1, 11.0).unwrap();
        assert_eq!(m.score_of("user1"), Some(11.0));
    }

    #[test]
    fn test_invalid_ticket_aborts_without_writing() {
        let (db, c1, _) = setup();
        ticket::revoke_ticket(&db, &c1, "compA").unwrap();

        let err = submit(&db, "user1", "R1M1", &c1, 25.0).unwrap_err();
        assert!(matches!(err, AppError::InvalidTicket));

        let err = submit(&db, "user1", "R1M1", "WRONGCODE1", 25.0).unwrap_err();
        assert!(matches!(err, AppError::InvalidTicket));

        let stored = stored_bracket(&db);
        assert!(stored.rounds[0].matches[0].scores.is_empty());
        assert_eq!(stored.rounds[0].matches[0].status, MatchStatus::Pending);
    }

    #[test]
    fn test_ticket_for_other_competition_rejected() {
        let (db, _, _) = setup();
        let other = fixtures::ticket_code(&db, "user1", "compB");
        let err = submit(&db, "user1", "R1M1", &other, 25.0).unwrap_err();
        assert!(matches!(err, AppError::InvalidTicket));
    }

    #[test]
    fn test_missing_bracket_and_match() {
        let db = Db::open_in_memory().unwrap();
        let code = fixtures::ticket_code(&db, "user1", "compA");
        let err = submit(&db, "user1", "R1M1", &code, 1.0).unwrap_err();
        assert!(matches!(err, AppError::BracketNotFound(_)));

        fixtures::put_bracket(&db, "compA", &fixtures::two_round_bracket());
        let err = submit(&db, "user1", "R7M7", &code, 1.0).unwrap_err();
        assert!(matches!(err, AppError::MatchNotFound(_)));
    }

    #[test]
    fn test_corrupt_bracket() {
        let db = Db::open_in_memory().unwrap();
        fixtures::put_raw_bracket(&db, "compA", "{\"rounds\": null}");
        let code = fixtures::ticket_code(&db, "user1", "compA");
        let err = submit(&db, "user1", "R1M1", &code, 1.0).unwrap_err();
        assert!(matches!(err, AppError::DataCorrupt(_)));
    }

    #[test]
    fn test_negative_scores_are_compared_numerically() {
        let (db, c1, c2) = setup();
        submit(&db, "user1", "R1M1", &c1, -3.0).unwrap();
        let m = submit(&db, "user2", "R1M1", &c2, -7.5).unwrap();
        assert_eq!(m.winner.as_deref(), Some("user1"));

        let err = submit(&db, "user1", "R1M1", &c1, f64::NAN).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_concurrent_submissions_keep_both_updates() {
        let (db, c1, _) = setup();
        let c3 = fixtures::ticket_code(&db, "user3", "compA");
        let db = Arc::new(db);

        let handles: Vec<_> = [("user1", "R1M1", c1), ("user3", "R1M2", c3)]
            .into_iter()
            .map(|(user, match_id, code)| {
                let db = db.clone();
                thread::spawn(move || submit(&db, user, match_id, &code, 5.0).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = stored_bracket(&db);
        assert_eq!(stored.rounds[0].matches[0].score_of("user1"), Some(5.0));
        assert_eq!(stored.rounds[0].matches[1].score_of("user3"), Some(5.0));
        assert_eq!(stored.rounds[0].matches[0].status, MatchStatus::Live);
    }
}
