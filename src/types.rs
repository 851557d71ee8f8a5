/// Modal layered over the landing screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Wizard,
    Callback,
    Help,
}

/// Focused row inside a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormCursor {
    pub row: usize,
}

impl FormCursor {
    pub fn reset(&mut self) {
        self.row = 0;
    }

    /// Move down, wrapping after the last of `rows`
    pub fn down(&mut self, rows: usize) {
        if rows > 0 {
            self.row = (self.row + 1) % rows;
        }
    }

    pub fn up(&mut self, rows: usize) {
        if rows > 0 {
            self.row = (self.row + rows - 1) % rows;
        }
    }

    /// Keep the cursor inside a row count that just changed
    pub fn clamp(&mut self, rows: usize) {
        self.row = self.row.min(rows.saturating_sub(1));
    }
}

/// Row under the cursor on the questions step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionRow {
    Question(usize),
    Message,
}

impl QuestionRow {
    pub fn from_cursor(cursor: FormCursor, questions: usize) -> Self {
        if cursor.row < questions {
            QuestionRow::Question(cursor.row)
        } else {
            QuestionRow::Message
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_wraps() {
        let mut cursor = FormCursor::default();
        cursor.up(3);
        assert_eq!(cursor.row, 2);
        cursor.down(3);
        assert_eq!(cursor.row, 0);
        cursor.down(0);
        assert_eq!(cursor.row, 0);
    }

    #[test]
    fn test_question_row_message_last() {
        assert_eq!(
            QuestionRow::from_cursor(FormCursor { row: 2 }, 3),
            QuestionRow::Question(2)
        );
        assert_eq!(QuestionRow::from_cursor(FormCursor { row: 3 }, 3), QuestionRow::Message);
        assert_eq!(QuestionRow::from_cursor(FormCursor { row: 0 }, 0), QuestionRow::Message);
    }
}
