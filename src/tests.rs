use super::*;

fn end_vote_tx(admin: &Voter, ballot: BallotAddress) -> BallotTransaction {
    let end = EndVoteTransaction::new(ballot, admin.identity());
    Signed::sign(admin.secret_key(), end).unwrap().into()
}

#[test]
fn end_to_end_ballot() {
    // Create the admin and three voters
    let admin = Voter::generate();
    let v1 = Voter::generate();
    let v2 = Voter::generate();
    let v3 = Voter::generate();

    let mut ledger = Ledger::default();
    ledger.advance_block();
    ledger.advance_block();

    // Deploy the ballot
    let ballot = ledger.deploy(admin.identity());
    assert_eq!(ledger.get_admin(&ballot).unwrap(), admin.identity());
    assert_eq!(ledger.get_vote_ended(&ballot).unwrap(), false);
    assert_eq!(ledger.get_active_at_block(&ballot).unwrap(), 2);

    // V1 votes for candidate 7
    ledger.submit(cast_vote(&v1, ballot, 7).into()).unwrap();
    assert_eq!(ledger.get_vote(&ballot, 7).unwrap(), 1);

    // V2 votes for candidate 7
    ledger.submit(cast_vote(&v2, ballot, 7).into()).unwrap();
    assert_eq!(ledger.get_vote(&ballot, 7).unwrap(), 2);

    // V1 tries again, switching to candidate 9 - rejected, tallies unchanged
    let rejected = ledger.submit(cast_vote(&v1, ballot, 9).into());
    assert!(matches!(rejected, Err(BallotError::DuplicateVote)));
    assert_eq!(ledger.get_vote(&ballot, 9).unwrap(), 0);
    assert_eq!(ledger.get_vote(&ballot, 7).unwrap(), 2);

    // Admin closes voting
    ledger.submit(end_vote_tx(&admin, ballot)).unwrap();
    assert_eq!(ledger.get_vote_ended(&ballot).unwrap(), true);

    // V3 arrives too late
    let late = ledger.submit(cast_vote(&v3, ballot, 7).into());
    assert!(matches!(late, Err(BallotError::VotingEnded)));
    assert_eq!(ledger.get_vote(&ballot, 7).unwrap(), 2);

    // Reads are idempotent
    assert_eq!(
        ledger.get_vote(&ballot, 7).unwrap(),
        ledger.get_vote(&ballot, 7).unwrap()
    );
}

#[test]
fn post_close_vote_rolls_back_nullifier() {
    let admin = Voter::generate();
    let latecomer = Voter::generate();

    let mut ledger = Ledger::default();
    let ballot = ledger.deploy(admin.identity());

    ledger.submit(end_vote_tx(&admin, ballot)).unwrap();

    let envelope = cast_vote(&latecomer, ballot, 4);
    let nullifier = envelope.nullifier;

    let late = ledger.submit(envelope.into());
    assert!(matches!(late, Err(BallotError::VotingEnded)));

    // The failed transaction must not have consumed the nullifier: the
    // insertion rolls back together with the staged tally write.
    assert!(!ledger.nullifier_spent(&nullifier));
    assert_eq!(ledger.get_vote(&ballot, 4).unwrap(), 0);
}

#[test]
fn double_vote_rejected_same_and_different_candidate() {
    let admin = Voter::generate();
    let voter = Voter::generate();

    let mut ledger = Ledger::default();
    let ballot = ledger.deploy(admin.identity());

    ledger.submit(cast_vote(&voter, ballot, 1).into()).unwrap();
    assert!(ledger.nullifier_spent(&voter.nullifier(&ballot)));

    let same = ledger.submit(cast_vote(&voter, ballot, 1).into());
    assert!(matches!(same, Err(BallotError::DuplicateVote)));

    let different = ledger.submit(cast_vote(&voter, ballot, 2).into());
    assert!(matches!(different, Err(BallotError::DuplicateVote)));

    assert_eq!(ledger.get_vote(&ballot, 1).unwrap(), 1);
    assert_eq!(ledger.get_vote(&ballot, 2).unwrap(), 0);
}

#[test]
fn unauthorized_end_vote() {
    let admin = Voter::generate();
    let intruder = Voter::generate();

    let mut ledger = Ledger::default();
    let ballot = ledger.deploy(admin.identity());

    let denied = ledger.submit(end_vote_tx(&intruder, ballot));
    assert!(matches!(denied, Err(BallotError::Unauthorized)));
    assert_eq!(ledger.get_vote_ended(&ballot).unwrap(), false);

    // Voting still works afterward
    let voter = Voter::generate();
    ledger.submit(cast_vote(&voter, ballot, 3).into()).unwrap();
    assert_eq!(ledger.get_vote(&ballot, 3).unwrap(), 1);
}

#[test]
fn repeated_end_vote_fails() {
    let admin = Voter::generate();

    let mut ledger = Ledger::default();
    let ballot = ledger.deploy(admin.identity());

    ledger.submit(end_vote_tx(&admin, ballot)).unwrap();
    let again = ledger.submit(end_vote_tx(&admin, ballot));
    assert!(matches!(again, Err(BallotError::VotingEnded)));
    assert_eq!(ledger.get_vote_ended(&ballot).unwrap(), true);
}

#[test]
fn same_voter_across_ballots() {
    let admin = Voter::generate();
    let voter = Voter::generate();

    let mut ledger = Ledger::default();
    let east = ledger.deploy(admin.identity());
    let west = ledger.deploy(admin.identity());

    // One vote per ballot, not one vote total across the ledger
    ledger.submit(cast_vote(&voter, east, 1).into()).unwrap();
    ledger.submit(cast_vote(&voter, west, 1).into()).unwrap();

    assert_eq!(ledger.get_vote(&east, 1).unwrap(), 1);
    assert_eq!(ledger.get_vote(&west, 1).unwrap(), 1);

    // Closing one ballot leaves the other open
    ledger.submit(end_vote_tx(&admin, east)).unwrap();
    assert_eq!(ledger.get_vote_ended(&east).unwrap(), true);
    assert_eq!(ledger.get_vote_ended(&west).unwrap(), false);
}

#[test]
fn vote_for_unknown_ballot_rejected() {
    let voter = Voter::generate();
    let mut ledger = Ledger::default();

    let phantom = BallotAddress::generate();
    let envelope = cast_vote(&voter, phantom, 1);
    let nullifier = envelope.nullifier;

    let rejected = ledger.submit(envelope.into());
    assert!(matches!(rejected, Err(BallotError::BallotNotFound(_))));
    assert!(!ledger.nullifier_spent(&nullifier));
}

#[test]
fn wire_transactions_still_execute() {
    let admin = Voter::generate();
    let voter = Voter::generate();

    let mut ledger = Ledger::default();
    let ballot = ledger.deploy(admin.identity());

    // Round-trip every transaction through its packed form first
    let vote_bytes = BallotTransaction::from(cast_vote(&voter, ballot, 5)).as_bytes();
    let vote = BallotTransaction::from_bytes(&vote_bytes).unwrap();
    ledger.submit(vote).unwrap();
    assert_eq!(ledger.get_vote(&ballot, 5).unwrap(), 1);

    let end_bytes = end_vote_tx(&admin, ballot).as_bytes();
    let end = BallotTransaction::from_bytes(&end_bytes).unwrap();
    ledger.submit(end).unwrap();
    assert_eq!(ledger.get_vote_ended(&ballot).unwrap(), true);
}
