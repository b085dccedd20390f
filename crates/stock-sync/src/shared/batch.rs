use super::error::SyncError;

/// Разделить список на части по `size` элементов.
///
/// Последняя часть может быть короче. Итератор ленивый, порядок элементов
/// сохраняется.
pub fn chunks<T>(items: &[T], size: usize) -> Result<std::slice::Chunks<'_, T>, SyncError> {
    if size == 0 {
        return Err(SyncError::InvalidBatchSize);
    }
    Ok(items.chunks(size))
}
