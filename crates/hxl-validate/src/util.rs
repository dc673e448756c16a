//! Small helpers shared by the checks.

/// Levenshtein distance over characters.
pub fn edit_distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a.chars().count();
    }
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0usize; b_chars.len() + 1];
    for (i, a_ch) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, b_ch) in b_chars.iter().enumerate() {
            let cost = usize::from(a_ch != *b_ch);
            let insert = curr[j] + 1;
            let delete = prev[j + 1] + 1;
            let replace = prev[j] + cost;
            curr[j + 1] = insert.min(delete).min(replace);
        }
        prev.clone_from_slice(&curr);
    }
    prev[b_chars.len()]
}

/// Closest candidate by edit distance; ties go to the earliest candidate.
pub fn closest<'a, I>(value: &str, candidates: I, fold_case: bool) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let probe = if fold_case {
        value.to_lowercase()
    } else {
        value.to_string()
    };
    let mut best: Option<(usize, &'a str)> = None;
    for candidate in candidates {
        let distance = if fold_case {
            edit_distance(&probe, &candidate.to_lowercase())
        } else {
            edit_distance(&probe, candidate)
        };
        if best.is_none_or(|(best_distance, _)| distance < best_distance) {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, candidate)| candidate)
}
