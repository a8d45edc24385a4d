//! Ratcliff/Obershelp similarity, as used to pick the closest group label.

/// Similarity of two strings in `[0, 1]`: twice the number of matched
/// characters over the total length of both strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

/// Sum of the sizes of the matching blocks: the longest common substring,
/// then recursively the longest ones to its left and right.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut pending = vec![(0, a.len(), 0, b.len())];
    let mut matched = 0;

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common run of `a[alo..ahi]` and `b[blo..bhi]`; the earliest one
/// in `a` wins ties.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run_len[j + 1] is the length of the run ending at a[i - 1], b[j].
    let mut run_len = vec![0usize; b.len() + 1];

    for i in alo..ahi {
        let mut next = vec![0usize; b.len() + 1];
        for j in blo..bhi {
            if a[i] != b[j] {
                continue;
            }
            let k = run_len[j] + 1;
            next[j + 1] = k;
            if k > best_size {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_size = k;
            }
        }
        run_len = next;
    }

    (best_i, best_j, best_size)
}

/// The candidate most similar to `word`, if its ratio reaches `cutoff`.
///
/// Equal scores go to the lexicographically greater candidate.
pub fn closest_match<'a, I>(word: &str, candidates: I, cutoff: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates
        .into_iter()
        .map(|candidate| (ratio(candidate, word), candidate))
        .filter(|(score, _)| *score >= cutoff)
        .max_by(|(sa, ca), (sb, cb)| sa.total_cmp(sb).then_with(|| ca.cmp(cb)))
        .map(|(_, candidate)| candidate)
}
