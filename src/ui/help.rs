use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

// Help section structure
pub struct HelpSection {
    pub title: &'static str,
    pub items: &'static [(&'static str, &'static str)],
}

// Help section definitions
pub const SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Navigation:",
        items: &[
            ("h/←", "Move left (or to the parent)"),
            ("j/↓", "Move down"),
            ("k/↑", "Move up"),
            ("l/→", "Move right"),
            ("r  ", "Go to root"),
        ],
    },
    HelpSection {
        title: "Nodes:",
        items: &[
            ("a/⇥", "Add child"),
            ("e/⏎", "Edit text"),
            ("d/⌦", "Delete node and its subtree"),
            ("c/C", "Next / previous colour"),
            ("x  ", "Mark node to move"),
            ("p  ", "Move marked node under the selection"),
            ("g  ", "Generate AI ideas"),
        ],
    },
    HelpSection {
        title: "Maps:",
        items: &[
            ("n  ", "New map"),
            ("[/]", "Previous / next map"),
            ("t  ", "Rename map"),
        ],
    },
    HelpSection {
        title: "Storage:",
        items: &[
            ("s  ", "Save"),
            ("A  ", "Toggle auto-save"),
            ("q  ", "Quit (saves first)"),
            ("Q  ", "Quit without saving"),
        ],
    },
];

// Help renderer
pub struct HelpRenderer;

impl HelpRenderer {
    pub fn render(frame: &mut Frame, area: Rect) {
        let help_text = Self::build_help_text();
        let block = Block::default().borders(Borders::ALL).title(" Help ");
        let paragraph = Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
    }

    pub fn build_help_text() -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(vec![Span::styled(
                "ai-mindmap Help",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
        ];

        for section in SECTIONS {
            lines.push(Line::from(vec![Span::styled(
                section.title,
                Style::default().add_modifier(Modifier::BOLD),
            )]));

            for (key, desc) in section.items {
                lines.push(Line::from(format!("  {}  {}", key, desc)));
            }

            lines.push(Line::from(""));
        }

        lines.push(Line::from("Press ESC or q to close help"));
        lines
    }
}
