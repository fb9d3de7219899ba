/// Map an out of range index back into `[0, len)` by mirroring without repeating the edge.
///
/// `-1 -> 1`, `len -> len - 2`. Indices far outside the range bounce until they land inside.
pub(crate) fn reflect_101(idx: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }

    let len = len as isize;
    let mut idx = idx;
    while idx < 0 || idx >= len {
        if idx < 0 {
            idx = -idx;
        }
        if idx >= len {
            idx = 2 * len - 2 - idx;
        }
    }
    idx as usize
}
