use pitch_duel::league::{LeagueTable, Team, generate_fixtures, simulate_round};
use pitch_duel::settings::Rgb;
use pitch_duel::TeamPalette;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::collections::HashMap;

fn league(n: usize) -> Vec<Team> {
    (0..n)
        .map(|i| {
            Team::new(
                format!("Club {i}"),
                format!("C{i:02}"),
                TeamPalette::new(Rgb::new(i as u8 * 10, 0, 0), Rgb::WHITE),
            )
        })
        .collect()
}

#[test]
fn twenty_team_season_balances() {
    let teams = league(20);
    let mut fixtures = generate_fixtures(teams.len());
    assert_eq!(fixtures.len(), 380);

    let rounds = fixtures.iter().map(|f| f.round).max().unwrap();
    assert_eq!(rounds, 38);

    let mut rng = Pcg32::seed_from_u64(2024);
    for round in 1..=rounds {
        assert_eq!(simulate_round(&mut rng, &mut fixtures, round, |_| false), 10);
    }
    assert!(fixtures.iter().all(|f| f.result.is_some()));

    let table = LeagueTable::from_fixtures(&teams, &fixtures);
    assert_eq!(table.rows.len(), 20);
    assert!(table.rows.iter().all(|r| r.played == 38));

    let won: u32 = table.rows.iter().map(|r| r.won).sum();
    let lost: u32 = table.rows.iter().map(|r| r.lost).sum();
    assert_eq!(won, lost);

    let draws = fixtures
        .iter()
        .filter(|f| f.result.is_some_and(|r| r.is_draw()))
        .count() as u32;
    let decisive = fixtures.len() as u32 - draws;
    let points: u32 = table.rows.iter().map(|r| r.points).sum();
    assert_eq!(points, 3 * decisive + 2 * draws);

    let goals_for: u32 = table.rows.iter().map(|r| r.goals_for).sum();
    let goals_against: u32 = table.rows.iter().map(|r| r.goals_against).sum();
    assert_eq!(goals_for, goals_against);

    // Sorted by points, never increasing down the table
    assert!(table.rows.windows(2).all(|w| w[0].points >= w[1].points));
}

#[test]
fn every_team_plays_each_round_once() {
    let fixtures = generate_fixtures(20);
    let mut per_round: HashMap<u32, Vec<usize>> = HashMap::new();
    for f in &fixtures {
        per_round.entry(f.round).or_default().extend([f.home, f.away]);
    }
    for (round, mut teams) in per_round {
        teams.sort_unstable();
        assert_eq!(teams, (0..20).collect::<Vec<_>>(), "round {round}");
    }
}

#[test]
fn home_and_away_are_balanced() {
    let fixtures = generate_fixtures(20);
    let mut home = [0u32; 20];
    for f in &fixtures {
        home[f.home] += 1;
    }
    assert!(home.iter().all(|&h| h == 19));
}
