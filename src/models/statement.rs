use serde::{Deserialize, Serialize};

use super::SpeechBlock;

/// Statements of one sitting day, in transcript order
///
/// Saved next to the backbone as `{base}.json`; statement `num` is the
/// fragment index of `{base}_{num}.html`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementList {
    #[serde(default)]
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    pub num: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub start_date_time: Option<String>,
    #[serde(default)]
    pub end_date_time: Option<String>,
}

impl StatementList {
    pub fn get(&self, num: u32) -> Option<&Statement> {
        self.statements.iter().find(|s| s.num == num)
    }

    /// One record per speech block whose fragment has a statement entry
    pub fn records_for<'a>(&'a self, blocks: &'a [SpeechBlock]) -> Vec<StatementRecord<'a>> {
        blocks
            .iter()
            .filter_map(|block| {
                let statement = self.get(block.fragment?)?;
                Some(StatementRecord {
                    id: &block.id,
                    num: statement.num,
                    name: statement.name.as_deref(),
                    function: statement.function.as_deref(),
                    start: statement.start_date_time.as_deref(),
                    end: statement.end_date_time.as_deref(),
                })
            })
            .collect()
    }
}

/// Record written to the statements artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementRecord<'a> {
    pub id: &'a str,
    pub num: u32,
    pub name: Option<&'a str>,
    pub function: Option<&'a str>,
    pub start: Option<&'a str>,
    pub end: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockKind;

    #[test]
    fn test_parse_statements() {
        let json = r#"{
            "proceedingNum": 1,
            "date": "2023-11-13",
            "statements": [
                {"num": 0, "name": "", "startDateTime": "2023-11-13T12:00:00"},
                {"num": 1, "name": "Jan Kowalski", "function": "Poseł"}
            ]
        }"#;
        let list: StatementList = serde_json::from_str(json).unwrap();

        assert_eq!(list.statements.len(), 2);
        assert_eq!(list.statements[0].start_date_time.as_deref(), Some("2023-11-13T12:00:00"));
        assert_eq!(list.get(1).and_then(|s| s.function.as_deref()), Some("Poseł"));
        assert!(list.get(5).is_none());
    }

    fn block(sequence: u64, kind: BlockKind, fragment: Option<u32>) -> SpeechBlock {
        SpeechBlock {
            id: format!("S_{sequence}"),
            sequence,
            kind,
            speaker: None,
            text: String::new(),
            fragment,
            metadata: vec![],
        }
    }

    #[test]
    fn test_records_follow_fragment_index() {
        let list: StatementList = serde_json::from_str(
            r#"{"statements": [
                {"num": 3, "name": "Marszałek", "function": "Marszałek Sejmu",
                 "startDateTime": "2024-01-10T10:00:00", "endDateTime": "2024-01-10T10:05:00"}
            ]}"#,
        )
        .unwrap();
        let blocks = vec![
            block(1, BlockKind::Context, None),
            block(2, BlockKind::Speech, Some(3)),
            block(3, BlockKind::Speech, Some(3)),
            block(4, BlockKind::Speech, Some(9)),
        ];

        let records = list.records_for(&blocks);
        let ids: Vec<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["S_2", "S_3"]);
        assert_eq!(records[0].function, Some("Marszałek Sejmu"));
        assert_eq!(records[0].end, Some("2024-01-10T10:05:00"));
    }
}
