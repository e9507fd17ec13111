//! Integration tests for the full match flow.
//!
//! These tests play complete matches from start to finish through the
//! engine and through a hosted ledger.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rps_match_core::{
    Choice, Commitment, HostError, Ledger, LocalLedger, Match, MatchError, MatchEvent, MatchHost,
    MatchState, Nonce, Outcome, PrincipalId, Slot,
};

fn key(s: &str) -> Nonce {
    Nonce::from_bytes(s.as_bytes().to_vec())
}

/// P1 plays Rock, P2 plays Paper, P2 wins
#[test]
fn test_full_match_paper_beats_rock() {
    let mut game = Match::new();
    let p1 = PrincipalId::new();
    let p2 = PrincipalId::new();

    game.join(p1).unwrap();
    game.join(p2).unwrap();
    assert_eq!(game.state(), MatchState::CommitPhase);

    game.submit_commitment(p1, Commitment::seal(Choice::Rock, &key("k1")))
        .unwrap();
    game.submit_commitment(p2, Commitment::seal(Choice::Paper, &key("k2")))
        .unwrap();
    assert_eq!(game.state(), MatchState::RevealPhase);

    game.reveal_choice(p1, 1, &key("k1")).unwrap();
    assert_eq!(game.revealed_choice(Slot::First), Some(Choice::Rock));
    game.reveal_choice(p2, 2, &key("k2")).unwrap();
    assert_eq!(game.revealed_choice(Slot::Second), Some(Choice::Paper));
    assert_eq!(game.state(), MatchState::Settleable);

    let event = game.settle().unwrap();
    assert_eq!(event.outcome(), Outcome::Winner(p2));
    assert_eq!(game, Match::new());
}

/// Same scenario, driven through authenticated calls on a local ledger
#[test]
fn test_hosted_match_paper_beats_rock() {
    let host = MatchHost::new(LocalLedger::in_memory());
    let p1 = host.ledger().register("player1").unwrap();
    let p2 = host.ledger().register("player2").unwrap();
    let stranger = host.ledger().register("stranger").unwrap();

    host.join(&p1.token).unwrap();
    host.join(&p2.token).unwrap();
    assert!(matches!(
        host.join(&stranger.token),
        Err(HostError::Match(MatchError::MatchFull))
    ));
    assert!(matches!(
        host.leave(&p1.token),
        Err(HostError::Match(MatchError::NotJoinable))
    ));

    host.submit_commitment(&p1.token, Commitment::seal(Choice::Rock, &key("k1")))
        .unwrap();
    assert!(matches!(
        host.submit_commitment(&stranger.token, Commitment::seal(Choice::Rock, &key("x"))),
        Err(HostError::Match(MatchError::NotAPlayer))
    ));
    host.submit_commitment(&p2.token, Commitment::seal(Choice::Paper, &key("k2")))
        .unwrap();

    assert!(matches!(
        host.reveal_choice(&p1.token, 3, &key("k1")),
        Err(HostError::Match(MatchError::CommitmentMismatch))
    ));
    host.reveal_choice(&p1.token, 1, &key("k1")).unwrap();
    host.reveal_choice(&p2.token, 2, &key("k2")).unwrap();

    // Settlement is open to any authenticated caller
    let outcome = host.settle(&stranger.token).unwrap();
    assert_eq!(outcome, Outcome::Winner(p2.principal_id));

    let view = host.view().unwrap();
    assert_eq!(view.state, MatchState::Empty);
    assert_eq!(view.players, [None, None]);
    assert_eq!(view.commitments, [None, None]);
    assert_eq!(view.revealed, [None, None]);

    let events = host.ledger().events().unwrap();
    assert_eq!(
        events,
        vec![MatchEvent::Settled {
            outcome: Outcome::Winner(p2.principal_id),
            players: [p1.principal_id, p2.principal_id],
            choices: [Choice::Rock, Choice::Paper],
        }]
    );
}

/// Consecutive matches on one ledger
#[test]
fn test_back_to_back_matches() {
    let host = MatchHost::new(LocalLedger::in_memory());
    let a = host.ledger().register("a").unwrap();
    let b = host.ledger().register("b").unwrap();

    let rounds = [
        (Choice::Rock, Choice::Scissors, Outcome::Winner(a.principal_id)),
        (Choice::Paper, Choice::Paper, Outcome::Draw),
        (Choice::Paper, Choice::Scissors, Outcome::Winner(b.principal_id)),
    ];

    for (choice_a, choice_b, expected) in rounds {
        let na = Nonce::random();
        let nb = Nonce::random();
        host.join(&a.token).unwrap();
        host.join(&b.token).unwrap();
        host.submit_commitment(&b.token, Commitment::seal(choice_b, &nb))
            .unwrap();
        host.submit_commitment(&a.token, Commitment::seal(choice_a, &na))
            .unwrap();
        host.reveal_choice(&b.token, choice_b.code(), &nb).unwrap();
        host.reveal_choice(&a.token, choice_a.code(), &na).unwrap();
        assert_eq!(host.settle(&a.token).unwrap(), expected);
    }

    assert_eq!(host.ledger().events().unwrap().len(), 3);
    assert_eq!(host.ledger().snapshot().unwrap(), Match::new());
}

/// Random operation sequences never break the match invariants, and
/// every rejected call leaves the match untouched.
#[test]
fn test_random_operations_keep_invariants() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let principals: Vec<PrincipalId> = (0..3).map(|_| PrincipalId::new()).collect();
    let nonces = [key("n0"), key("n1"), key("n2")];

    for _ in 0..200 {
        let mut game = Match::new();
        let mut sealed: [Option<Choice>; 3] = [None; 3];

        for _ in 0..40 {
            let who = rng.gen_range(0..principals.len());
            let principal = principals[who];
            let before = game.clone();

            let result = match rng.gen_range(0..6) {
                0 => game.join(principal).map(|_| ()),
                1 => game.leave(principal),
                2 => {
                    let choice = Choice::ALL[rng.gen_range(0..3)];
                    let outcome =
                        game.submit_commitment(principal, Commitment::seal(choice, &nonces[who]));
                    if outcome.is_ok() {
                        sealed[who] = Some(choice);
                    }
                    outcome.map(|_| ())
                }
                3 => {
                    // Usually reveal honestly, sometimes lie or send garbage
                    let code = match (rng.gen_range(0..4), sealed[who]) {
                        (0, _) => rng.gen_range(0..=5),
                        (_, Some(choice)) => choice.code(),
                        (_, None) => 1,
                    };
                    game.reveal_choice(principal, code, &nonces[who]).map(|_| ())
                }
                4 => match game.settle() {
                    Ok(_) => {
                        sealed = [None; 3];
                        Ok(())
                    }
                    Err(e) => Err(e),
                },
                _ => {
                    let stranger = PrincipalId::new();
                    assert_eq!(
                        game.reveal_choice(stranger, 1, &nonces[0]),
                        Err(MatchError::NotAPlayer)
                    );
                    Err(MatchError::NotAPlayer)
                }
            };

            if result.is_err() {
                assert_eq!(game, before);
            }
            if game.state() == MatchState::Empty {
                sealed = [None; 3];
            }

            assert!(game.is_consistent(), "inconsistent match: {:?}", game);
            if let [Some(x), Some(y)] = game.players() {
                assert_ne!(x, y);
            }
        }
    }
}
