//! Character frequency statistics over detected overlaps.

use std::collections::HashMap;

use crate::geometry::round2;
use crate::overlap::OverlapRecord;

/// How often one character took part in overlaps.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterStat {
    pub character: String,
    /// Occurrences across both slots of every overlap.
    pub overlap_count: usize,
    /// Share of all character occurrences, rounded to two decimals.
    pub percentage: f64,
}

/// Character statistics for a set of overlaps.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterStats {
    /// Sorted by descending count; ties keep first-seen order.
    pub character_stats: Vec<CharacterStat>,
    pub total_unique_chars: usize,
    pub total_character_occurrences: usize,
}

impl CharacterStats {
    pub fn is_empty(&self) -> bool {
        self.character_stats.is_empty()
    }

    /// The `n` most frequent entries.
    pub fn top(&self, n: usize) -> &[CharacterStat] {
        &self.character_stats[..n.min(self.character_stats.len())]
    }
}

/// Count each character's appearances in `overlaps`.
///
/// Both `char_a` and `char_b` of every record count, so a character that
/// overlaps itself contributes twice. Percentages are relative to the total
/// number of occurrences, not the number of overlaps.
pub fn character_statistics(overlaps: &[OverlapRecord]) -> CharacterStats {
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for overlap in overlaps {
        for ch in [overlap.char_a.as_str(), overlap.char_b.as_str()] {
            match index.get(ch) {
                Some(&i) => order[i].1 += 1,
                None => {
                    index.insert(ch, order.len());
                    order.push((ch, 1));
                }
            }
        }
    }

    if order.is_empty() {
        return CharacterStats::default();
    }

    // Stable sort keeps first-seen order among equal counts
    order.sort_by(|a, b| b.1.cmp(&a.1));

    let total: usize = order.iter().map(|(_, count)| count).sum();
    let character_stats = order
        .iter()
        .map(|&(ch, count)| CharacterStat {
            character: ch.to_string(),
            overlap_count: count,
            percentage: round2(count as f64 / total as f64 * 100.0),
        })
        .collect();

    CharacterStats {
        character_stats,
        total_unique_chars: order.len(),
        total_character_occurrences: total,
    }
}
