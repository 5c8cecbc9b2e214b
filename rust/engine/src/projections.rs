use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

use crate::models::{CatalogEntry, HistoryGroup, MediaKind, VideoGroup};

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

pub fn normalize_category(value: &str) -> String {
    value.trim().to_lowercase()
}

pub fn filter_by_category(entries: &[CatalogEntry], category: &str) -> Vec<CatalogEntry> {
    let wanted = normalize_category(category);
    entries
        .iter()
        .filter(|entry| normalize_category(&entry.category) == wanted)
        .cloned()
        .collect()
}

/// Stable sort, most recently viewed first. Entries sharing a timestamp keep
/// their original collection order.
pub fn sort_by_viewed_at_desc(entries: &[CatalogEntry]) -> Vec<CatalogEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.viewed_at_epoch.cmp(&a.viewed_at_epoch));
    sorted
}

/// Case-insensitive substring match against title or author. A blank query is
/// the identity, not an empty result.
pub fn search(entries: &[CatalogEntry], query: &str) -> Vec<CatalogEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|entry| {
            entry.title.to_lowercase().contains(&needle)
                || entry.author.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

pub fn favorites(entries: &[CatalogEntry]) -> Vec<CatalogEntry> {
    entries
        .iter()
        .filter(|entry| entry.favorites)
        .cloned()
        .collect()
}

/// Favorites that have not been placed in a named group yet; this is the pool
/// offered when the user assembles a new list.
pub fn ungrouped_favorites(entries: &[CatalogEntry]) -> Vec<CatalogEntry> {
    entries
        .iter()
        .filter(|entry| entry.favorites && entry.group_label.is_empty())
        .cloned()
        .collect()
}

/// Named sub-lists of the favorites view. Group order is the first appearance
/// of each label in the collection; groups only exist while they have members.
pub fn favorite_groups(entries: &[CatalogEntry]) -> Vec<VideoGroup> {
    let mut groups: Vec<VideoGroup> = Vec::new();
    for entry in entries {
        if !entry.favorites || entry.group_label.is_empty() {
            continue;
        }
        match groups
            .iter_mut()
            .find(|group| group.label == entry.group_label)
        {
            Some(group) => group.entries.push(entry.clone()),
            None => groups.push(VideoGroup {
                label: entry.group_label.clone(),
                entries: vec![entry.clone()],
            }),
        }
    }
    groups
}

/// Viewing history, partitioned by calendar day in the viewer's time zone.
/// Both the groups and the entries inside each group run most-recent-first.
pub fn history_by_day(entries: &[CatalogEntry], offset: FixedOffset) -> Vec<HistoryGroup> {
    let mut groups: Vec<(NaiveDate, HistoryGroup)> = Vec::new();
    for entry in sort_by_viewed_at_desc(entries) {
        let day = local_day(entry.viewed_at_epoch, offset);
        match groups.last_mut() {
            Some((last_day, group)) if *last_day == day => group.entries.push(entry),
            _ => groups.push((
                day,
                HistoryGroup {
                    day_label: day_label(day),
                    entries: vec![entry],
                },
            )),
        }
    }
    groups.into_iter().map(|(_, group)| group).collect()
}

/// Display form used by the history page, e.g. "15 de abril 2025".
pub fn day_label(date: NaiveDate) -> String {
    use chrono::Datelike;
    let month = MONTHS_ES[date.month0() as usize];
    format!("{} de {} {}", date.day(), month, date.year())
}

/// Thumbnails may point at an image or a short clip; the host decides how to
/// render based on the file extension.
pub fn media_kind(uri: &str) -> MediaKind {
    let path = uri
        .split(['?', '#'])
        .next()
        .unwrap_or(uri)
        .to_ascii_lowercase();
    if path.ends_with(".mp4") {
        MediaKind::VideoClip
    } else {
        MediaKind::Image
    }
}

fn local_day(epoch_seconds: i64, offset: FixedOffset) -> NaiveDate {
    Utc.timestamp_opt(epoch_seconds, 0)
        .single()
        .unwrap_or_default()
        .with_timezone(&offset)
        .date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, category: &str, viewed_at_epoch: i64) -> CatalogEntry {
        CatalogEntry {
            id,
            title: format!("Video {id}"),
            thumbnail: "https://example.edu/thumb.jpg".to_string(),
            author: "Profesora Demo".to_string(),
            avatar: None,
            role: "Profesora".to_string(),
            description: String::new(),
            viewed_at_epoch,
            duration: "10:00".to_string(),
            category: category.to_string(),
            favorites: false,
            later: false,
            my_videos: false,
            group_label: String::new(),
        }
    }

    fn favorite(id: i64, group_label: &str) -> CatalogEntry {
        CatalogEntry {
            favorites: true,
            group_label: group_label.to_string(),
            ..entry(id, "Historia", 0)
        }
    }

    #[test]
    fn category_match_is_case_insensitive() {
        let entries = vec![
            entry(1, "Historia", 0),
            entry(2, "historia", 0),
            entry(3, "Ciencia", 0),
        ];

        let matched = filter_by_category(&entries, "Historia");
        let ids: Vec<i64> = matched.iter().map(|video| video.id).collect();
        assert_eq!(ids, vec![1, 2]);

        assert!(filter_by_category(&entries, "Arte").is_empty());
    }

    #[test]
    fn category_match_ignores_surrounding_whitespace() {
        let entries = vec![entry(1, " Historia ", 0)];
        assert_eq!(filter_by_category(&entries, "historia").len(), 1);
    }

    #[test]
    fn sort_is_a_descending_permutation_with_stable_ties() {
        let entries = vec![
            entry(1, "Historia", 100),
            entry(2, "Historia", 300),
            entry(3, "Historia", 100),
            entry(4, "Historia", 200),
        ];

        let sorted = sort_by_viewed_at_desc(&entries);
        assert_eq!(sorted.len(), entries.len());
        for pair in sorted.windows(2) {
            assert!(pair[0].viewed_at_epoch >= pair[1].viewed_at_epoch);
        }
        // ids 1 and 3 share a timestamp; insertion order breaks the tie
        let ids: Vec<i64> = sorted.iter().map(|video| video.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn blank_search_returns_input_unchanged() {
        let entries = vec![entry(1, "Historia", 0), entry(2, "Ciencia", 0)];
        let found = search(&entries, "   ");
        assert_eq!(found, entries);
    }

    #[test]
    fn search_matches_title_or_author_substring() {
        let mut entries = vec![entry(1, "Historia", 0), entry(2, "Ciencia", 0)];
        entries[0].title = "La revolución francesa".to_string();
        entries[1].author = "Carlos Ramírez".to_string();

        assert_eq!(search(&entries, "REVOLUCIÓN")[0].id, 1);
        assert_eq!(search(&entries, "ramírez")[0].id, 2);
        assert!(search(&entries, "química").is_empty());
    }

    #[test]
    fn grouped_favorites_keep_first_appearance_order() {
        let entries = vec![
            favorite(1, "Clase A"),
            favorite(2, "Clase B"),
            favorite(3, "Clase A"),
            favorite(4, ""),
        ];

        let groups = favorite_groups(&entries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "Clase A");
        assert_eq!(groups[1].label, "Clase B");
        let ids: Vec<i64> = groups[0].entries.iter().map(|video| video.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn entry_appears_under_its_label_and_nowhere_else() {
        let entries = vec![favorite(1, "Clase A"), favorite(2, "Clase B")];
        let groups = favorite_groups(&entries);
        for group in &groups {
            for video in &group.entries {
                assert_eq!(video.group_label, group.label);
            }
        }
    }

    #[test]
    fn group_vanishes_when_last_member_is_relabeled() {
        let mut entries = vec![favorite(1, "Clase A"), favorite(2, "Clase B")];
        entries[0].group_label = String::new();

        let groups = favorite_groups(&entries);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "Clase B");
    }

    #[test]
    fn non_favorites_never_reach_the_grouping() {
        let mut entries = vec![favorite(1, "Clase A")];
        entries[0].favorites = false;
        assert!(favorite_groups(&entries).is_empty());
    }

    #[test]
    fn ungrouped_favorites_excludes_grouped_entries() {
        let entries = vec![favorite(1, "Clase A"), favorite(2, "")];
        let pool = ungrouped_favorites(&entries);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].id, 2);
    }

    #[test]
    fn same_day_views_share_a_group_with_later_time_first() {
        let utc = FixedOffset::east_opt(0).expect("zero offset");
        // 2025-04-15 at 10:20 and 14:30 UTC
        let morning = Utc
            .with_ymd_and_hms(2025, 4, 15, 10, 20, 0)
            .single()
            .expect("valid datetime")
            .timestamp();
        let afternoon = Utc
            .with_ymd_and_hms(2025, 4, 15, 14, 30, 0)
            .single()
            .expect("valid datetime")
            .timestamp();

        let entries = vec![entry(1, "Historia", morning), entry(2, "Historia", afternoon)];
        let groups = history_by_day(&entries, utc);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].day_label, "15 de abril 2025");
        let ids: Vec<i64> = groups[0].entries.iter().map(|video| video.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn history_groups_run_most_recent_day_first() {
        let utc = FixedOffset::east_opt(0).expect("zero offset");
        let day_one = Utc
            .with_ymd_and_hms(2025, 4, 14, 9, 0, 0)
            .single()
            .expect("valid datetime")
            .timestamp();
        let day_two = Utc
            .with_ymd_and_hms(2025, 4, 15, 9, 0, 0)
            .single()
            .expect("valid datetime")
            .timestamp();

        let entries = vec![entry(1, "Historia", day_one), entry(2, "Historia", day_two)];
        let groups = history_by_day(&entries, utc);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].day_label, "15 de abril 2025");
        assert_eq!(groups[1].day_label, "14 de abril 2025");
    }

    #[test]
    fn history_respects_the_viewer_offset() {
        // 2025-04-15 23:30 UTC is already April 16th at UTC+5
        let lima_plus_five = FixedOffset::east_opt(5 * 3600).expect("offset");
        let late_night = Utc
            .with_ymd_and_hms(2025, 4, 15, 23, 30, 0)
            .single()
            .expect("valid datetime")
            .timestamp();

        let groups = history_by_day(&[entry(1, "Historia", late_night)], lima_plus_five);
        assert_eq!(groups[0].day_label, "16 de abril 2025");
    }

    #[test]
    fn empty_history_yields_no_groups() {
        let utc = FixedOffset::east_opt(0).expect("zero offset");
        assert!(history_by_day(&[], utc).is_empty());
    }

    #[test]
    fn mp4_thumbnails_render_as_clips() {
        assert_eq!(media_kind("/videos/php.mp4"), MediaKind::VideoClip);
        assert_eq!(media_kind("/videos/CLIP.MP4?start=3"), MediaKind::VideoClip);
        assert_eq!(media_kind("/videos/matematica2.gif"), MediaKind::Image);
        assert_eq!(media_kind("https://example.edu/a.png#frame"), MediaKind::Image);
    }
}
