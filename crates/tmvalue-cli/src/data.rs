use std::{fs::File, io, path::Path};

use anyhow::Context as _;
use serde::de::DeserializeOwned;
use tmvalue_analysis::game_log::GameRecord;
use tmvalue_engine::CardRecord;

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Reads every row of a CSV file with headers. Cells are trimmed and empty
/// cells become `None`.
pub fn read_csv_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| {
            // header is line 1
            row.with_context(|| {
                format!(
                    "Failed to parse {} CSV file: {} (line {})",
                    file_kind,
                    path.display(),
                    i + 2
                )
            })
        })
        .collect()
}

pub fn read_cards_csv<P>(path: P) -> anyhow::Result<Vec<CardRecord>>
where
    P: AsRef<Path>,
{
    read_csv_file("cards", path)
}

pub fn read_games_csv<P>(path: P) -> anyhow::Result<Vec<GameRecord>>
where
    P: AsRef<Path>,
{
    read_csv_file("games", path)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use tmvalue_engine::{CardField, GameStatistics};

    use super::*;

    fn temp_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_cards_csv() {
        let file = temp_file(
            "\
Title,Primary_Cost,Additional_Cost,Victory_Points,Immediate_Benefit,Passive_Benefit,Active_Cost,Active_Benefit,Removed_from_Opponent,Tags
Mine,4,,,1 STEEL,,,,,building
Comet,21,,,\" 1 temp, 1 ocean \",,,,3 plant,space event
",
        );
        let cards = read_cards_csv(file.path()).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].text(CardField::ImmediateBenefit), Some("1 STEEL"));
        assert_eq!(cards[0].additional_cost, None);
        assert_eq!(
            cards[1].text(CardField::ImmediateBenefit),
            Some("1 temp, 1 ocean")
        );
        assert_eq!(cards[1].text(CardField::RemovedFromOpponent), Some("3 plant"));
        assert_eq!(cards[1].text(CardField::ActiveCost), None);
    }

    #[test]
    fn test_read_cards_csv_reports_line() {
        let file = temp_file("Title,Primary_Cost\nMine,four\n");
        let error = read_cards_csv(file.path()).unwrap_err();
        assert!(format!("{error}").contains("line 2"), "{error}");
    }

    #[test]
    fn test_read_games_csv() {
        let file = temp_file(
            "\
players,generations,expansions,map,duration
3,11,['CORPORATE'],THARSIS,95
",
        );
        let games = read_games_csv(file.path()).unwrap();
        assert_eq!(games, [GameRecord::base(3, 11)]);
    }

    #[test]
    fn test_read_json_file() {
        let file = temp_file(r#"{"2": 12, "3": 10}"#);
        let stats: GameStatistics = read_json_file("game statistics", file.path()).unwrap();
        assert_eq!(stats.last_generation(3).unwrap(), 10);

        let file = temp_file(r#"{"9": 12}"#);
        assert!(read_json_file::<GameStatistics, _>("game statistics", file.path()).is_err());
    }
}
