#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Revealed,
    Matched,
}

impl Visibility {
    pub fn is_face_up(self) -> bool {
        self != Visibility::Hidden
    }

    pub fn css_class(self) -> Option<&'static str> {
        match self {
            Visibility::Hidden => None,
            Visibility::Revealed => Some("active"),
            Visibility::Matched => Some("matched"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub index: usize,
    pub symbol: String,
    pub visibility: Visibility,
}

impl Card {
    pub fn hidden(index: usize, symbol: impl Into<String>) -> Self {
        Card {
            index,
            symbol: symbol.into(),
            visibility: Visibility::Hidden,
        }
    }

    pub fn is_flippable(&self) -> bool {
        self.visibility == Visibility::Hidden
    }
}
