use std::fmt::Write as _;

use chrono::{FixedOffset, TimeZone};

use crate::core::{GitError, ObjectId, Result};

/// Format used when a configured timestamp format cannot be rendered
const FALLBACK_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Author or committer of a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    /// Email without the surrounding angle brackets
    pub email: String,
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    pub offset: FixedOffset,
}

impl Identity {
    /// Parse `Name <email> timestamp timezone`
    pub fn parse(id: &ObjectId, s: &str) -> Result<Self> {
        let malformed = |what: &str| GitError::MalformedCommit(*id, format!("{}: {}", what, s));

        let parts: Vec<&str> = s.trim_end().rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(malformed("invalid identity format"));
        }
        let (tz_str, timestamp_str, name_email) = (parts[0], parts[1], parts[2]);

        let (name, email) = match (name_email.find('<'), name_email.rfind('>')) {
            (Some(start), Some(end)) if start < end => (
                name_email[..start].trim(),
                &name_email[start + 1..end],
            ),
            _ => match name_email.rsplit_once(' ') {
                Some((name, email)) => (name.trim(), email),
                None => return Err(malformed("missing email in identity")),
            },
        };

        let timestamp = timestamp_str
            .parse::<i64>()
            .map_err(|_| malformed("invalid timestamp"))?;
        let offset = parse_offset(tz_str).ok_or_else(|| malformed("invalid timezone offset"))?;

        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            timestamp,
            offset,
        })
    }

    /// Render as `<name> <email> <label> timestamp: <time> <offset>`
    pub fn to_text(&self, label: &str, timestamp_format: &str) -> String {
        let label = if label.is_empty() {
            "timestamp:".to_string()
        } else {
            format!("{} timestamp:", label)
        };
        format!(
            "{} {} {} {} {}",
            self.name,
            self.email,
            label,
            self.format_time(timestamp_format),
            format_offset(&self.offset)
        )
    }

    fn format_time(&self, timestamp_format: &str) -> String {
        let time = match self.offset.timestamp_opt(self.timestamp, 0).single() {
            Some(time) => time,
            None => return self.timestamp.to_string(),
        };

        let mut out = String::new();
        if write!(out, "{}", time.format(timestamp_format)).is_err() {
            out.clear();
            let _ = write!(out, "{}", time.format(FALLBACK_TIMESTAMP_FORMAT));
        }
        out
    }
}

/// Parse a `+HHMM` / `-HHMM` offset
fn parse_offset(s: &str) -> Option<FixedOffset> {
    if s.len() != 5 || !s.is_ascii() || !s[1..].bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let sign = match &s[..1] {
        "+" => 1,
        "-" => -1,
        _ => return None,
    };
    let hours = s[1..3].parse::<i32>().ok()?;
    let minutes = s[3..5].parse::<i32>().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// `+03:00`, `-05:30`, or `Z` for UTC
fn format_offset(offset: &FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    if secs == 0 {
        return "Z".to_string();
    }
    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.abs();
    format!("{}{:02}:{:02}", sign, secs / 3600, (secs % 3600) / 60)
}

/// Represents a Git commit object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// The tree object ID
    pub tree: ObjectId,
    /// Parent commit IDs in declaration order
    pub parents: Vec<ObjectId>,
    pub author: Identity,
    pub committer: Identity,
    pub message: String,
}

impl Commit {
    /// Decode a commit payload.
    ///
    /// Headers run up to the first blank line; everything after it is the
    /// message. Headers other than tree/parent/author/committer (and their
    /// continuation lines) are skipped. Angle brackets are dropped from the
    /// message and trailing newlines trimmed.
    pub fn decode(id: &ObjectId, payload: &[u8]) -> Result<Self> {
        let content = String::from_utf8_lossy(payload);
        let (headers, message) = match content.find("\n\n") {
            Some(pos) => (&content[..pos], &content[pos + 2..]),
            None => (content.trim_end_matches('\n'), ""),
        };

        let mut tree = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut committer = None;

        for line in headers.lines() {
            if line.starts_with(' ') {
                continue;
            }
            let (key, value) = line.split_once(' ').unwrap_or((line, ""));
            match key {
                "tree" => {
                    if tree.is_some() {
                        return Err(GitError::MalformedCommit(*id, "duplicate tree header".to_string()));
                    }
                    tree = Some(parse_id(id, "tree", value)?);
                }
                "parent" => parents.push(parse_id(id, "parent", value)?),
                "author" => author = Some(Identity::parse(id, value)?),
                "committer" => committer = Some(Identity::parse(id, value)?),
                _ => {}
            }
        }

        Ok(Self {
            tree: tree.ok_or(GitError::MissingField(*id, "tree"))?,
            parents,
            author: author.ok_or(GitError::MissingField(*id, "author"))?,
            committer: committer.ok_or(GitError::MissingField(*id, "committer"))?,
            message: message
                .trim_end_matches('\n')
                .chars()
                .filter(|c| !matches!(c, '<' | '>'))
                .collect(),
        })
    }

    /// Structured field dump used by `cat-file`
    pub fn render(&self, timestamp_format: &str) -> String {
        let mut out = format!("tree: {}\n", self.tree);
        if !self.parents.is_empty() {
            let parents: Vec<String> = self.parents.iter().map(ObjectId::to_hex).collect();
            out.push_str(&format!("parents: {}\n", parents.join(" | ")));
        }
        out.push_str(&format!("author: {}\n", self.author.to_text("original", timestamp_format)));
        out.push_str(&format!("committer: {}\n", self.committer.to_text("commit", timestamp_format)));
        out.push_str("commit message:\n");
        out.push_str(&self.message);
        out
    }
}

fn parse_id(commit: &ObjectId, key: &str, value: &str) -> Result<ObjectId> {
    ObjectId::from_hex(value)
        .map_err(|_| GitError::MalformedCommit(*commit, format!("invalid {} id: {}", key, value)))
}
