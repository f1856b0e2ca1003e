// Edit distance shared by the miner (clustering near-duplicates)
// and the searcher (typo-tolerant token matching).

/// Levenshtein distance between two strings, counted in chars.
///
/// Keeps a single row sized to the shorter string, so memory is
/// O(min(a, b)) while time stays O(a * b).
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Row runs along the shorter one
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return long.len();
    }

    let mut row: Vec<usize> = (0..=short.len()).collect();

    for (i, lc) in long.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, sc) in short.iter().enumerate() {
            let above = row[j + 1];
            let cost = if lc == sc { 0 } else { 1 };

            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = above;
        }
    }

    row[short.len()]
}

/// Levenshtein distance over pre-split chars, but only if it's at most
/// `max`. Returns `None` as soon as the answer is known to be bigger.
///
/// Only cells within `max` of the diagonal are filled, and the scan stops
/// once a whole row is past `max`, so a miss costs about O(max * len).
pub fn levenshtein_within(a: &[char], b: &[char], max: usize) -> Option<usize> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    if long.len() - short.len() > max {
        return None;
    }
    if short.is_empty() {
        return Some(long.len());
    }

    // Anything past `max` is just "too far"; out-of-band cells hold this
    let too_far = max + 1;
    let mut row: Vec<usize> = (0..=short.len()).map(|j| j.min(too_far)).collect();

    for i in 1..=long.len() {
        let lo = i.saturating_sub(max).max(1);
        let hi = (i + max).min(short.len());

        let mut diagonal = row[lo - 1];
        row[lo - 1] = if lo == 1 { i.min(too_far) } else { too_far };
        let mut row_min = row[lo - 1];

        for j in lo..=hi {
            let above = row[j];
            let cost = if long[i - 1] == short[j - 1] { 0 } else { 1 };

            let value = (above + 1)
                .min(row[j - 1] + 1)
                .min(diagonal + cost)
                .min(too_far);
            diagonal = above;
            row[j] = value;
            row_min = row_min.min(value);
        }

        // Next row reads this cell as "above"; it was outside our band
        if hi < short.len() {
            row[hi + 1] = too_far;
        }

        if row_min > max {
            return None;
        }
    }

    let distance = row[short.len()];
    (distance <= max).then_some(distance)
}

/// Cheap check before paying for `levenshtein`: lengths alone already
/// put a lower bound on the distance.
pub fn length_gap(a: &str, b: &str) -> usize {
    a.chars().count().abs_diff(b.chars().count())
}
