//! League fixtures and standings
//!
//! Double round-robin scheduling and the league table the match-flow layer
//! shows between games. Teams are referenced by their index in the team
//! list so fixtures stay cheap to copy and serialize.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::settings::TeamPalette;

/// Points for a win and a draw
pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;
/// Simulated results draw each side's goals from 0..=this
pub const MAX_SIMULATED_GOALS: u32 = 4;

/// A league team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    /// Short code shown on the scoreboard
    pub abbr: String,
    pub palette: TeamPalette,
}

impl Team {
    pub fn new(name: impl Into<String>, abbr: impl Into<String>, palette: TeamPalette) -> Self {
        Self {
            name: name.into(),
            abbr: abbr.into(),
            palette,
        }
    }
}

/// Final score of one fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home_goals: u32,
    pub away_goals: u32,
}

impl MatchResult {
    pub fn is_draw(&self) -> bool {
        self.home_goals == self.away_goals
    }
}

/// One scheduled game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    /// 1-based round number
    pub round: u32,
    /// Index into the team list
    pub home: usize,
    pub away: usize,
    pub result: Option<MatchResult>,
}

/// Build a double round robin for `team_count` teams
///
/// Circle method: the first team stays put while the rest rotate one place
/// per round. An odd count gets a bye slot, and whoever draws the bye sits
/// that round out. Home and away alternate down each round's pairings, and
/// the second half replays the first with venues swapped.
pub fn generate_fixtures(team_count: usize) -> Vec<Fixture> {
    if team_count < 2 {
        return Vec::new();
    }

    // None marks the bye
    let mut slots: Vec<Option<usize>> = (0..team_count).map(Some).collect();
    if slots.len() % 2 != 0 {
        slots.push(None);
    }
    let rounds = slots.len() - 1;
    let per_round = slots.len() / 2;

    let mut first_half = Vec::with_capacity(rounds * per_round);
    for round in 0..rounds {
        for pairing in 0..per_round {
            let (Some(a), Some(b)) = (slots[pairing], slots[slots.len() - 1 - pairing]) else {
                continue;
            };
            let (home, away) = if pairing % 2 == 0 { (a, b) } else { (b, a) };
            first_half.push(Fixture {
                round: round as u32 + 1,
                home,
                away,
                result: None,
            });
        }
        if let Some(last) = slots.pop() {
            slots.insert(1, last);
        }
    }

    let second_half: Vec<Fixture> = first_half
        .iter()
        .map(|f| Fixture {
            round: f.round + rounds as u32,
            home: f.away,
            away: f.home,
            result: None,
        })
        .collect();

    log::debug!(
        "Generated {} fixtures over {} rounds for {} teams",
        first_half.len() * 2,
        rounds * 2,
        team_count
    );
    first_half.extend(second_half);
    first_half
}

/// Random result for a game between two computer-controlled teams
pub fn simulate_result(rng: &mut impl Rng) -> MatchResult {
    MatchResult {
        home_goals: rng.random_range(0..=MAX_SIMULATED_GOALS),
        away_goals: rng.random_range(0..=MAX_SIMULATED_GOALS),
    }
}

/// Fill in every unplayed fixture of `round` with a simulated result
///
/// `skip` lets the caller keep a fixture (the human's game) open. Returns
/// how many results were filled in.
pub fn simulate_round(
    rng: &mut impl Rng,
    fixtures: &mut [Fixture],
    round: u32,
    skip: impl Fn(&Fixture) -> bool,
) -> usize {
    let mut played = 0;
    for fixture in fixtures.iter_mut() {
        if fixture.round != round || fixture.result.is_some() || skip(fixture) {
            continue;
        }
        fixture.result = Some(simulate_result(rng));
        played += 1;
    }
    played
}

/// A team's line in the table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub team: usize,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
}

impl TableRow {
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    fn record(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        if scored > conceded {
            self.won += 1;
            self.points += POINTS_FOR_WIN;
        } else if scored < conceded {
            self.lost += 1;
        } else {
            self.drawn += 1;
            self.points += POINTS_FOR_DRAW;
        }
    }
}

/// Sorted standings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueTable {
    pub rows: Vec<TableRow>,
}

impl LeagueTable {
    /// Tally every played fixture
    ///
    /// Unplayed fixtures and fixtures naming an unknown team are ignored.
    /// Rows are ordered by points, then goal difference, then goals scored,
    /// then team name.
    pub fn from_fixtures(teams: &[Team], fixtures: &[Fixture]) -> Self {
        let mut rows: Vec<TableRow> = (0..teams.len())
            .map(|team| TableRow {
                team,
                ..Default::default()
            })
            .collect();

        for fixture in fixtures {
            let Some(result) = fixture.result else {
                continue;
            };
            if fixture.home >= rows.len() || fixture.away >= rows.len() || fixture.home == fixture.away {
                log::warn!("Skipping fixture with bad teams: {} vs {}", fixture.home, fixture.away);
                continue;
            }
            rows[fixture.home].record(result.home_goals, result.away_goals);
            rows[fixture.away].record(result.away_goals, result.home_goals);
        }

        rows.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
                .then_with(|| b.goals_for.cmp(&a.goals_for))
                .then_with(|| teams[a.team].name.cmp(&teams[b.team].name))
        });
        Self { rows }
    }

    /// 1-based position of a team
    pub fn position(&self, team: usize) -> Option<usize> {
        self.rows.iter().position(|r| r.team == team).map(|i| i + 1)
    }

    pub fn leader(&self) -> Option<&TableRow> {
        self.rows.first()
    }
}
