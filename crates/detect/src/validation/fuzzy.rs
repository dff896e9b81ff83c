//! Closest-name suggestions for misspelled methods and type tags.

/// Find the closest match using Levenshtein distance, ignoring case.
/// Returns None if the best distance exceeds half the longer string.
pub(crate) fn fuzzy_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let input_lower = input.to_lowercase();
    candidates
        .iter()
        .map(|&candidate| (candidate, levenshtein(&input_lower, &candidate.to_lowercase())))
        .min_by_key(|&(_, dist)| dist)
        .filter(|&(name, dist)| dist <= input.len().max(name.len()) / 2)
        .map(|(name, _)| name)
}

/// Levenshtein edit distance between two strings.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
