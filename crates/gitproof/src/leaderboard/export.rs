use super::LeaderboardEntry;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write leaderboard csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush leaderboard csv: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard csv was not valid utf-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Renders ranked entries as CSV with a header row.
pub fn to_csv(entries: &[LeaderboardEntry]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "rank",
        "username",
        "full_name",
        "score",
        "grade",
        "view_count",
    ])?;

    for entry in entries {
        writer.write_record([
            entry.rank.to_string(),
            entry.username.clone(),
            entry.full_name.clone(),
            format!("{:.2}", entry.score),
            entry.grade.to_string(),
            entry.view_count.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Grade;

    #[test]
    fn writes_header_and_rows() {
        let entries = vec![LeaderboardEntry {
            rank: 1,
            username: "octo".to_string(),
            full_name: "Octo, Cat".to_string(),
            avatar_url: None,
            score: 8.5,
            grade: Grade::A,
            view_count: 3,
        }];

        let csv = to_csv(&entries).expect("csv");
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("rank,username,full_name,score,grade,view_count")
        );
        assert_eq!(lines.next(), Some("1,octo,\"Octo, Cat\",8.50,A,3"));
        assert_eq!(lines.next(), None);
    }
}
