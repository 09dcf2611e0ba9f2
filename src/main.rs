use std::fmt::Display;
use std::io::{self, Write as _};

use anyhow::{bail, Context, Result};
use aramelo_model::{Hero, Lineup, PlayerId, Team};
use log::error;
use pairelo::RatingKind;
use rand::thread_rng;

mod aramelo;
mod logging;

use aramelo::draft::DraftAction;
use aramelo::store::Store;
use aramelo::Aramelo;

pub fn print_err(e: &impl Display) {
    error!("{e:#}")
}

fn main() {
    let _logger = logging::init();
    if let Err(e) = run() {
        print_err(&e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut app = Aramelo::load(Store::open_default())?;
    loop {
        println!();
        println!("============= MAIN MENU =============");
        println!("1. Check Player Stats");
        println!("2. Create Players");
        println!("3. Start Randomizer");
        println!("4. Custom Pick and Ban");
        println!("5. Exit");
        let choice = prompt("Enter your choice (1/2/3/4/5): ")?;
        println!("=====================================");

        match choice.as_str() {
            "1" => show_stats(&app),
            "2" => create_players(&mut app)?,
            "3" => report_flow_outcome(run_randomizer(&mut app)),
            "4" => report_flow_outcome(run_draft(&mut app)),
            "5" => break,
            _ => println!("Invalid input. Please enter a valid option."),
        }
    }
    app.save()
}

/// Flow errors (bad selection, undersized group) return the user to
/// the menu instead of aborting the session.
fn report_flow_outcome(result: Result<()>) {
    if let Err(e) = result {
        println!("Error: {e:#}");
    }
}

fn prompt(msg: &str) -> Result<String> {
    print!("{msg}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        bail!("input stream closed");
    }
    Ok(line.trim().to_string())
}

fn show_stats(app: &Aramelo) {
    if app.roster().is_empty() {
        println!("No players found. Add players by choosing 'Create Players' from the menu.");
        return;
    }
    println!();
    println!(
        "{:<20} {:<10} {:<10} {:<8} {:<8} {:<8} {:<8} {:<25} {:<10}",
        "Name", "Rank", "PB Rank", "Wins", "Losses", "PB W's", "PB L's", "Most Played Hero", "Win Rate"
    );
    println!("{}", "-".repeat(120));
    for player in app.roster().all() {
        println!(
            "{:<20} {:<10.2} {:<10.2} {:<8} {:<8} {:<8} {:<8} {:<25} {:<9.2}%",
            player.id,
            player.rank,
            player.pb_rank,
            player.stats.wins,
            player.stats.losses,
            player.stats.pb_wins,
            player.stats.pb_losses,
            player.most_selected_hero().map_or("N/A", Hero::as_str),
            player.win_rate()
        );
    }
    println!("{}", "-".repeat(120));
}

fn create_players(app: &mut Aramelo) -> Result<()> {
    let names = prompt("Enter player names separated by comma: ")?;
    app.add_players(names.split(',').map(String::from));
    println!("Players added successfully.");
    Ok(())
}

fn select_for_match(app: &Aramelo) -> Result<Vec<PlayerId>> {
    if app.roster().is_empty() {
        bail!("no players found, add players by choosing 'Create Players' from the menu");
    }
    println!();
    println!("Select players for the match:");
    let ids: Vec<PlayerId> = app.roster().all().map(|p| p.id.clone()).collect();
    for (i, id) in ids.iter().enumerate() {
        println!("{}. {}", i + 1, id);
    }

    let input = prompt("Enter player numbers separated by commas (e.g., 1,2,3): ")?;
    let mut names: Vec<&str> = Vec::new();
    for token in input.split(',') {
        let number: usize = token
            .trim()
            .parse()
            .with_context(|| format!("invalid player number: {}", token.trim()))?;
        let id = number
            .checked_sub(1)
            .and_then(|idx| ids.get(idx))
            .with_context(|| format!("no player with number {number}"))?;
        names.push(id.as_str());
    }
    app.select_players(&names)
}

fn display_team(app: &Aramelo, team: Team, lineup: &Lineup) {
    println!();
    println!("-------------- {team} --------------");
    println!("{:<15} {:<12} {:<10}", "Player", "Hero", "Role");
    println!("{}", "-".repeat(37));
    for id in lineup.iter() {
        let Some(player) = app.roster().get(id) else {
            continue;
        };
        println!(
            "{:<15} {:<12} {:<10}",
            player.id,
            player.hero.as_ref().map_or("N/A", Hero::as_str),
            player.role.map_or("N/A", |role| role.as_str())
        );
    }
}

fn run_randomizer(app: &mut Aramelo) -> Result<()> {
    let selected = select_for_match(app)?;
    loop {
        let (one, two) = app.make_teams(&selected, &mut thread_rng())?;
        display_team(app, Team::One, &one);
        display_team(app, Team::Two, &two);

        println!();
        println!("Options:");
        println!("  1. Team 1 wins");
        println!("  2. Team 2 wins");
        println!("  r. Reshuffle Teams");
        println!("  q. Quit to Menu");
        let choice = prompt("Choose an option: ")?;
        match choice.to_lowercase().as_str() {
            "1" => app.record_match_result(&one, &two, RatingKind::General)?,
            "2" => app.record_match_result(&two, &one, RatingKind::General)?,
            "r" => continue,
            "q" => break,
            _ => {
                println!("Invalid input. Please enter a valid option.");
                continue;
            }
        }

        let reshuffle = prompt("Reshuffle teams? (Y/N): ")?;
        if reshuffle.to_lowercase() != "y" {
            break;
        }
        println!("=====================================");
    }
    Ok(())
}

fn show_available_heroes(heroes: impl IntoIterator<Item = impl Display>) {
    println!();
    println!("Available heroes:");
    for hero in heroes {
        println!("{hero}");
    }
}

fn run_draft(app: &mut Aramelo) -> Result<()> {
    let selected = select_for_match(app)?;
    let mut draft = app.start_draft(selected, &mut thread_rng())?;

    while let Some(turn) = draft.current_turn() {
        let result = match turn.action {
            DraftAction::Ban => {
                show_available_heroes(draft.available_heroes());
                let hero = prompt(&format!(
                    "\n{} bans by {}. Enter the hero to ban: ",
                    turn.team, turn.player
                ))?;
                app.draft_ban(&mut draft, Hero::from(hero))
            }
            DraftAction::Pick => {
                let hero = prompt(&format!(
                    "\n{} picks. Enter the hero for player {}: ",
                    turn.team, turn.player
                ))?;
                app.draft_pick(&mut draft, Hero::from(hero))
            }
        };
        // Strict validation failures re-prompt the same turn.
        if let Err(e) = result {
            println!("{e:#}. Please enter a valid hero.");
        }
    }

    let (one, two) = draft.into_lineups()?;
    display_team(app, Team::One, &one);
    display_team(app, Team::Two, &two);

    println!();
    println!("Match result:");
    println!("  1. Team 1 wins");
    println!("  2. Team 2 wins");
    loop {
        let choice = prompt("Choose an option: ")?;
        match choice.as_str() {
            "1" => {
                app.record_match_result(&one, &two, RatingKind::PickBan)?;
                break;
            }
            "2" => {
                app.record_match_result(&two, &one, RatingKind::PickBan)?;
                break;
            }
            _ => println!("Invalid input. Please enter a valid option."),
        }
    }
    Ok(())
}
