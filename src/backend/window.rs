pub const FIRST_COMIC: i64 = 1;
pub const LAST_COMIC: i64 = 2475;

/// Maps a number one cycle outside `[FIRST_COMIC, LAST_COMIC]` back into range.
///
/// This is a single shift, not a modulo: values further than one cycle away
/// stay out of range.
pub fn wrap_comic_number(n: i64) -> i64 {
    if n > LAST_COMIC {
        n - LAST_COMIC
    } else if n < FIRST_COMIC {
        LAST_COMIC + n
    } else {
        n
    }
}

/// Returns the comic numbers shown around `center`, in display order.
///
/// e.g. `center = 1, count = 3` gives `[2475, 1, 2]`. Counts other than 3 or 5
/// collapse to the center alone.
pub fn comic_numbers(center: i64, count: usize) -> Vec<i64> {
    let offsets: &[i64] = match count {
        5 => &[-2, -1, 0, 1, 2],
        3 => &[-1, 0, 1],
        _ => &[0],
    };

    offsets
        .iter()
        .map(|offset| wrap_comic_number(center + offset))
        .collect()
}
