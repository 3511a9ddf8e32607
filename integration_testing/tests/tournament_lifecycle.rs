//! End-to-end scenarios over real HTTP: a league manager, referee(s), and
//! players as separately bound loopback servers, driven exactly the way an
//! operator console and the agents themselves would drive them.

mod common;

use common::{spawn_league_manager, spawn_player, spawn_referee, spawn_referee_fast};
use league_manager::MatchRules;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_two_deterministic_players_when_the_league_runs_then_the_lower_id_wins_every_round() -> anyhow::Result<()> {
    // Arrange: one league manager, one referee, and two players who always
    // play the same move -- player_a's id sorts first, so it is ODD, and
    // 3 + 2 is odd every round, so it wins every round.
    let handle = spawn_league_manager(MatchRules::default(), 8).await;
    spawn_referee("REF1", 4, &handle.endpoint).await;
    spawn_player("Alice", "fixed_move", Some(3), &handle.endpoint).await;
    spawn_player("Bob", "fixed_move", Some(2), &handle.endpoint).await;

    // Act
    handle.start_league().await;
    let status = handle.run_all_rounds().await;

    // Assert
    assert_eq!(status.phase, "COMPLETE");
    assert_eq!(status.total_rounds, 1);

    let standings = handle.get_standings().await;
    assert_eq!(standings.standings.len(), 2);
    let winner = standings.standings.iter().find(|e| e.rank == 1).expect("a rank-1 entry exists");
    assert_eq!(winner.player_id, "P01");
    assert_eq!(winner.wins, 1);
    assert_eq!(winner.losses, 0);
    let loser = standings.standings.iter().find(|e| e.rank == 2).expect("a rank-2 entry exists");
    assert_eq!(loser.player_id, "P02");
    assert_eq!(loser.wins, 0);
    assert_eq!(loser.losses, 1);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_an_odd_number_of_players_when_the_league_runs_then_every_player_sits_out_exactly_one_round() -> anyhow::Result<()>
{
    // Arrange: three players means a bye seat in every round of a
    // round-robin schedule; each player misses exactly one round.
    let handle = spawn_league_manager(MatchRules::default(), 8).await;
    spawn_referee("REF1", 4, &handle.endpoint).await;
    spawn_player("Alice", "always_lowest", None, &handle.endpoint).await;
    spawn_player("Bob", "always_lowest", None, &handle.endpoint).await;
    spawn_player("Cleo", "always_lowest", None, &handle.endpoint).await;

    // Act
    handle.start_league().await;
    let status = handle.run_all_rounds().await;

    // Assert
    assert_eq!(status.phase, "COMPLETE");
    assert_eq!(status.total_rounds, 3);

    let standings = handle.get_standings().await;
    assert_eq!(standings.standings.len(), 3);
    for entry in &standings.standings {
        assert_eq!(entry.games_played, 2, "player {} should sit out exactly one of three rounds", entry.player_id);
        assert_eq!(entry.wins + entry.losses + entry.draws, entry.games_played);
    }
    let ranks: Vec<u32> = standings.standings.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3], "standings are returned in rank order");

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_a_match_result_already_applied_when_it_is_reported_again_then_standings_do_not_double_count() -> anyhow::Result<()>
{
    // Arrange: run a minimal two-player league to completion so there is a
    // real, already-applied match result to replay.
    let handle = spawn_league_manager(MatchRules::default(), 8).await;
    spawn_referee("REF1", 4, &handle.endpoint).await;
    spawn_player("Alice", "fixed_move", Some(3), &handle.endpoint).await;
    spawn_player("Bob", "fixed_move", Some(2), &handle.endpoint).await;
    handle.start_league().await;
    handle.run_all_rounds().await;

    let before = handle.get_standings().await;

    // Act: replay the exact result the referee already delivered -- this is
    // what a referee retrying an unacknowledged report looks like from the
    // league manager's side.
    let replayed = transport::ReportMatchResultParams {
        match_id: "R1M1".to_string(),
        referee_id: "REF1".to_string(),
        winner_id: Some("P01".to_string()),
        scores: [("P01".to_string(), 3), ("P02".to_string(), 0)].into_iter().collect(),
        rounds_summary: Vec::new(),
    };
    let ack = handle.lm.report_match_result(replayed).await.expect("idempotent replay is acknowledged, not rejected");
    assert!(ack.acknowledged);

    // Assert: standings are bit-for-bit identical to the first application.
    let after = handle.get_standings().await;
    assert_eq!(before.standings, after.standings);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_a_silent_opponent_when_the_default_move_threshold_is_exceeded_then_the_other_player_wins_by_forfeit(
) -> anyhow::Result<()> {
    // Arrange: Bob never answers `request_move`. With the default rules
    // (3 rounds, threshold 2) his third default move exceeds the tolerated
    // count mid-match, ending it in a forfeit before a third round of
    // scores is ever adjudicated. The referee's own outbound client is
    // deadline-scaled so each of Bob's timeouts takes milliseconds, not 30s.
    let handle = spawn_league_manager(MatchRules::default(), 8).await;
    spawn_referee_fast("REF1", 4, &handle.endpoint).await;
    spawn_player("Alice", "fixed_move", Some(3), &handle.endpoint).await;
    spawn_player("Bob", "silent", None, &handle.endpoint).await;

    // Act
    handle.start_league().await;
    let status = handle.run_all_rounds().await;

    // Assert
    assert_eq!(status.phase, "COMPLETE");

    let standings = handle.get_standings().await;
    let alice = standings.standings.iter().find(|e| e.player_id == "P01").expect("P01 is in standings");
    let bob = standings.standings.iter().find(|e| e.player_id == "P02").expect("P02 is in standings");
    assert_eq!(alice.wins, 1, "Alice wins the forfeit despite never outscoring Bob on adjudicated rounds");
    assert_eq!(alice.losses, 0);
    assert_eq!(bob.wins, 0);
    assert_eq!(bob.losses, 1);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_more_pairings_than_free_referee_capacity_when_a_round_runs_then_dispatch_waits_for_a_freed_slot(
) -> anyhow::Result<()> {
    // Arrange: 6 players round-robin to 3 simultaneous pairings in round 1,
    // but only 2 referees at capacity 1 each -- one pairing has nowhere to
    // go until an earlier match reports its result and frees a slot.
    let handle = spawn_league_manager(MatchRules::default(), 8).await;
    spawn_referee("REF1", 1, &handle.endpoint).await;
    spawn_referee("REF2", 1, &handle.endpoint).await;
    for name in ["Alice", "Bob", "Cleo", "Dana", "Erin", "Fay"] {
        spawn_player(name, "always_lowest", None, &handle.endpoint).await;
    }

    // Act
    handle.start_league().await;
    let status = handle.run_next_round().await;

    // Assert: the round barrier only lifts once all 3 matches -- including
    // the one that had to wait for capacity -- have reported a result.
    assert!(status.phase == "BETWEEN_ROUNDS" || status.phase == "COMPLETE");
    let standings = handle.get_standings().await;
    assert_eq!(standings.standings.len(), 6);
    let total_wins: u32 = standings.standings.iter().map(|e| e.wins).sum();
    assert_eq!(total_wins, 3, "all 3 pairings of the first round reached a decision");
    for entry in &standings.standings {
        assert_eq!(entry.games_played, 1, "every player has exactly one match in round 1 of a 6-player league");
    }

    Ok(())
}
