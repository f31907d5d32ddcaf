use crate::keyboard::layout::HebrewLayout;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Pinky,
    Ring,
    Middle,
    Index,
    Thumb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FingerAssignment {
    pub hand: Hand,
    pub finger: Finger,
}

impl FingerAssignment {
    pub fn new(hand: Hand, finger: Finger) -> Self {
        Self { hand, finger }
    }

    pub fn describe(&self) -> String {
        let hand = match self.hand {
            Hand::Left => "left",
            Hand::Right => "right",
        };
        let finger = match self.finger {
            Finger::Pinky => "pinky",
            Finger::Ring => "ring",
            Finger::Middle => "middle",
            Finger::Index => "index",
            Finger::Thumb => "thumb",
        };
        format!("{hand} {finger}")
    }
}

fn qwerty_finger(ch: char) -> FingerAssignment {
    use Finger::*;
    use Hand::*;

    match ch {
        'q' | 'a' | 'z' => FingerAssignment::new(Left, Pinky),
        'w' | 's' | 'x' => FingerAssignment::new(Left, Ring),
        'e' | 'd' | 'c' => FingerAssignment::new(Left, Middle),
        'r' | 'f' | 'v' | 't' | 'g' | 'b' => FingerAssignment::new(Left, Index),
        'y' | 'h' | 'n' | 'u' | 'j' | 'm' => FingerAssignment::new(Right, Index),
        'i' | 'k' | ',' => FingerAssignment::new(Right, Middle),
        'o' | 'l' | '.' => FingerAssignment::new(Right, Ring),
        'p' | ';' | '/' | '\'' => FingerAssignment::new(Right, Pinky),
        ' ' => FingerAssignment::new(Right, Thumb),
        _ => FingerAssignment::new(Right, Index),
    }
}

/// Finger for a Hebrew character, through the physical key that types it.
pub fn hebrew_finger(layout: &HebrewLayout, ch: char) -> Option<FingerAssignment> {
    if ch == ' ' {
        return Some(qwerty_finger(' '));
    }
    layout.latin_for(ch).map(qwerty_finger)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_row_letters() {
        let layout = HebrewLayout::new();
        assert_eq!(
            hebrew_finger(&layout, 'כ'),
            Some(FingerAssignment::new(Hand::Left, Finger::Index))
        );
        assert_eq!(
            hebrew_finger(&layout, 'ש'),
            Some(FingerAssignment::new(Hand::Left, Finger::Pinky))
        );
        assert_eq!(
            hebrew_finger(&layout, 'ף'),
            Some(FingerAssignment::new(Hand::Right, Finger::Pinky))
        );
    }

    #[test]
    fn unmapped_char_has_no_finger() {
        let layout = HebrewLayout::new();
        assert_eq!(hebrew_finger(&layout, '7'), None);
        assert_eq!(hebrew_finger(&layout, ' ').map(|f| f.finger), Some(Finger::Thumb));
    }

    #[test]
    fn describe_reads_naturally() {
        assert_eq!(
            FingerAssignment::new(Hand::Right, Finger::Ring).describe(),
            "right ring"
        );
    }
}
