#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum App {
    Fit,
    Journal,
    Quick,
}

impl App {
    pub fn title(&self) -> &'static str {
        match self {
            App::Fit => "Nina Fit",
            App::Journal => "Nina Journal",
            App::Quick => "Nina Quick",
        }
    }

    pub fn home(&self) -> &'static str {
        match self {
            App::Fit => "/",
            App::Journal => "/journal",
            App::Quick => "/quick",
        }
    }

    pub fn nav(&self) -> &'static [NavItem] {
        match self {
            App::Fit => FIT_NAV,
            App::Journal => JOURNAL_NAV,
            App::Quick => QUICK_NAV,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

const FIT_NAV: &[NavItem] = &[
    NavItem {
        label: "Home",
        href: "/",
    },
    NavItem {
        label: "History",
        href: "/history",
    },
];

const JOURNAL_NAV: &[NavItem] = &[
    NavItem {
        label: "Journal",
        href: "/journal",
    },
    NavItem {
        label: "Timeline",
        href: "/journal/timeline",
    },
];

const QUICK_NAV: &[NavItem] = &[NavItem {
    label: "Quick",
    href: "/quick",
}];
