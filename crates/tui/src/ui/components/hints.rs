use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A key and what it does on the current screen.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

pub mod common {
    use super::KeyHint;

    pub fn form_editing() -> Vec<KeyHint> {
        vec![
            KeyHint::new("Tab", "berikutnya"),
            KeyHint::new("←→", "pilih"),
            KeyHint::new("Enter", "simpan"),
            KeyHint::new("Esc", "batal"),
        ]
    }

    pub fn confirm() -> Vec<KeyHint> {
        vec![KeyHint::new("y", "hapus"), KeyHint::new("n", "batal")]
    }

    pub fn search() -> Vec<KeyHint> {
        vec![
            KeyHint::new("ketik", "cari"),
            KeyHint::new("Enter/Esc", "selesai"),
        ]
    }

    pub fn crud_list(searchable: bool, filterable: bool) -> Vec<KeyHint> {
        let mut hints = vec![
            KeyHint::new("j/k", "pilih"),
            KeyHint::new("n/p", "halaman"),
            KeyHint::new("c", "tambah"),
            KeyHint::new("e", "ubah"),
            KeyHint::new("d", "hapus"),
        ];
        if searchable {
            hints.push(KeyHint::new("/", "cari"));
        }
        if filterable {
            hints.push(KeyHint::new("f", "jenis"));
        }
        hints.push(KeyHint::new("r", "muat ulang"));
        hints
    }

    pub fn global_shortcuts() -> Vec<KeyHint> {
        vec![
            KeyHint::new("1-9", "menu"),
            KeyHint::new("Ctrl+L", "keluar"),
            KeyHint::new("q", "tutup"),
        ]
    }
}
