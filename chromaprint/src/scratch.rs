use crate::ChromaprintError;

/// Allocates a zero-filled scratch table of `len` entries.
///
/// Allocation failure is reported as [`ChromaprintError::Alloc`] instead of
/// aborting the process. The table is dropped on every exit path of the
/// caller.
pub(crate) fn zeroed<T: Copy + Default>(
    what: &'static str,
    len: usize,
) -> Result<Vec<T>, ChromaprintError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| ChromaprintError::Alloc { what, len })?;
    buf.resize(len, T::default());
    Ok(buf)
}
