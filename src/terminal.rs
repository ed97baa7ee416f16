// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::frame::Frame;

pub struct Terminal {
    stdout: Stdout,
    size: Option<(u16, u16)>,
    run_buf: String,
    order: Vec<usize>,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            size: None,
            run_buf: String::with_capacity(64),
            order: Vec::new(),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    fn set_colors(
        &mut self,
        fg: Option<Color>,
        bg: Option<Color>,
        cur: &mut Option<(Option<Color>, Option<Color>)>,
    ) -> Result<()> {
        let (cur_fg, cur_bg) = match *cur {
            Some((f, b)) => (Some(f), Some(b)),
            None => (None, None),
        };
        if cur_fg != Some(fg) {
            self.stdout
                .queue(SetForegroundColor(fg.unwrap_or(Color::Reset)))?;
        }
        if cur_bg != Some(bg) {
            self.stdout
                .queue(SetBackgroundColor(bg.unwrap_or(Color::Reset)))?;
        }
        *cur = Some((fg, bg));
        Ok(())
    }

    /// Writes the frame's pending changes. Horizontally adjacent changed cells
    /// that share colors go out as one run.
    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let size = (frame.width, frame.height);
        let full = frame.is_dirty_all() || self.size != Some(size);
        if full {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.order.clear();
            self.order
                .extend(0..frame.width as usize * frame.height as usize);
        } else {
            self.order.clear();
            self.order.extend_from_slice(frame.dirty_indices());
            self.order.sort_unstable();
        }

        let width = frame.width as usize;
        let mut colors: Option<(Option<Color>, Option<Color>)> = None;
        let mut cursor_at: Option<usize> = None;
        let mut i = 0;
        while i < self.order.len() {
            let start = self.order[i];
            let head = frame.cell_at_index(start);
            self.run_buf.clear();
            self.run_buf.push(head.ch);

            let mut end = start;
            let mut j = i + 1;
            while j < self.order.len() {
                let idx = self.order[j];
                if idx != end + 1 || idx % width == 0 {
                    break;
                }
                let cell = frame.cell_at_index(idx);
                if cell.fg != head.fg || cell.bg != head.bg {
                    break;
                }
                self.run_buf.push(cell.ch);
                end = idx;
                j += 1;
            }

            if cursor_at != Some(start) {
                self.stdout.queue(cursor::MoveTo(
                    (start % width) as u16,
                    (start / width) as u16,
                ))?;
            }
            self.set_colors(head.fg, head.bg, &mut colors)?;
            self.stdout.queue(Print(self.run_buf.as_str()))?;
            cursor_at = if (end + 1) % width == 0 {
                None
            } else {
                Some(end + 1)
            };
            i = j;
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        self.size = Some(size);
        frame.clear_dirty();
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore_terminal_best_effort();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
