use chrono::{Datelike, NaiveDate};

use crate::models::Release;

pub const PIXELS_PER_DAY: i64 = 6;
pub const MIN_WIDTH: i64 = 1200;
pub const NODE_PADDING: i64 = 100;
pub const END_PADDING: i64 = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineNode {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub apps: Vec<String>,
    /// Horizontal position in px.
    pub left: i64,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLayout {
    pub width: i64,
    pub nodes: Vec<TimelineNode>,
}

impl TimelineLayout {
    /// Lay out releases, already sorted by date, along the year of the
    /// first one. The last release is the current one.
    pub fn new(releases: &[Release]) -> Self {
        let Some(first) = releases.first() else {
            return Self {
                width: MIN_WIDTH,
                nodes: Vec::new(),
            };
        };

        let year = first.date.year();
        let (Some(start), Some(end)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) else {
            return Self {
                width: MIN_WIDTH,
                nodes: Vec::new(),
            };
        };

        let total_days = (end - start).num_days();
        let width = (total_days * PIXELS_PER_DAY).max(MIN_WIDTH) + END_PADDING;
        let last = releases.len() - 1;

        let nodes = releases
            .iter()
            .enumerate()
            .map(|(i, release)| TimelineNode {
                id: release.id.clone(),
                title: release.title.clone(),
                date: release.date,
                apps: release.apps.clone(),
                left: (release.date - start).num_days() * PIXELS_PER_DAY + NODE_PADDING,
                is_current: i == last,
            })
            .collect();

        Self { width, nodes }
    }

    pub fn current(&self) -> Option<&TimelineNode> {
        self.nodes.last()
    }
}
