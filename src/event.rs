/// A key event.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct KeyEvent {
    /// The key code.
    pub code: KeyCode,
    /// Whether the control key is pressed.
    pub ctrl: bool,
    /// Whether the alt key is pressed.
    pub alt: bool,
    /// Whether the shift key is pressed.
    pub shift: bool,
}

impl KeyEvent {
    /// Constructs a [`KeyEvent`] without modifiers.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            ctrl: false,
            alt: false,
            shift: false,
        }
    }
}

/// Convert a [`web_sys::KeyboardEvent`] to a [`KeyEvent`].
impl From<web_sys::KeyboardEvent> for KeyEvent {
    fn from(event: web_sys::KeyboardEvent) -> Self {
        let shift = event.shift_key();
        KeyEvent {
            code: KeyCode::from_key(&event.key(), shift),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            shift,
        }
    }
}

/// A key code.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KeyCode {
    /// Normal letter key input.
    Char(char),
    /// Enter or return key
    Enter,
    /// Left arrow key
    Left,
    /// Right arrow key
    Right,
    /// Up arrow key
    Up,
    /// Down arrow key
    Down,
    /// Tab key
    Tab,
    /// Shift + Tab
    BackTab,
    /// Home key
    Home,
    /// End key
    End,
    /// Escape key
    Esc,
    /// Unidentified.
    Unidentified,
}

impl KeyCode {
    /// Maps the `key` attribute of a keyboard event.
    pub fn from_key(key: &str, shift: bool) -> Self {
        let mut chars = key.chars();
        if let (Some(char), None) = (chars.next(), chars.next()) {
            return KeyCode::Char(char);
        }
        match key {
            "Enter" => KeyCode::Enter,
            "ArrowLeft" => KeyCode::Left,
            "ArrowRight" => KeyCode::Right,
            "ArrowUp" => KeyCode::Up,
            "ArrowDown" => KeyCode::Down,
            "Tab" if shift => KeyCode::BackTab,
            "Tab" => KeyCode::Tab,
            "Home" => KeyCode::Home,
            "End" => KeyCode::End,
            "Escape" => KeyCode::Esc,
            _ => KeyCode::Unidentified,
        }
    }
}

/// A mouse event, in grid coordinates.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MouseEvent {
    /// The triggered event.
    pub kind: MouseEventKind,
    /// The column under the pointer.
    pub col: u16,
    /// The row under the pointer.
    pub row: u16,
    /// Whether the control key is pressed.
    pub ctrl: bool,
    /// Whether the alt key is pressed.
    pub alt: bool,
    /// Whether the shift key is pressed.
    pub shift: bool,
}

impl MouseEvent {
    /// Constructs a [`MouseEvent`] without modifiers.
    pub fn new(kind: MouseEventKind, col: u16, row: u16) -> Self {
        Self {
            kind,
            col,
            row,
            ctrl: false,
            alt: false,
            shift: false,
        }
    }
}

/// A mouse button.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
    /// Back mouse button
    Back,
    /// Forward mouse button
    Forward,
    /// Unidentified mouse button
    Unidentified,
}

/// Convert the `button` attribute of a [`web_sys::MouseEvent`] to a [`MouseButton`].
impl From<i16> for MouseButton {
    fn from(button: i16) -> Self {
        match button {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            3 => MouseButton::Back,
            4 => MouseButton::Forward,
            _ => MouseButton::Unidentified,
        }
    }
}

/// A mouse event kind.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MouseEventKind {
    /// Mouse moved
    Moved,
    /// Mouse button pressed
    Pressed(MouseButton),
    /// Mouse button released
    Released(MouseButton),
    /// Mouse button clicked
    Clicked(MouseButton),
    /// Pointer left the element
    Exited,
    /// Unidentified mouse event
    Unidentified,
}

impl MouseEventKind {
    /// Maps the type of a DOM mouse event.
    pub fn from_event_type(event_type: &str, button: MouseButton) -> Self {
        match event_type {
            "mousemove" => MouseEventKind::Moved,
            "mousedown" => MouseEventKind::Pressed(button),
            "mouseup" => MouseEventKind::Released(button),
            "click" => MouseEventKind::Clicked(button),
            "mouseleave" => MouseEventKind::Exited,
            _ => MouseEventKind::Unidentified,
        }
    }
}
