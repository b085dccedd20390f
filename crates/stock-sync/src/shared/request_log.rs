use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Журнал HTTP-обмена с API маркетплейса (отдельный файл на маркетплейс)
#[derive(Debug, Clone)]
pub struct RequestLog {
    path: Option<PathBuf>,
}

impl RequestLog {
    pub fn new(dir: &Path, file_name: &str) -> Self {
        Self {
            path: Some(dir.join(file_name)),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Записать в лог-файл. Ошибки записи игнорируются
    pub fn write(&self, message: &str) {
        let Some(path) = &self.path else {
            return;
        };
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] {}", timestamp, message);
        }
    }
}

/// Обрезать тело ответа для логов
pub fn preview(body: &str, max_chars: usize) -> String {
    let preview: String = body.chars().take(max_chars).collect();
    if preview.len() < body.len() {
        format!("{}...", preview)
    } else {
        preview
    }
}
