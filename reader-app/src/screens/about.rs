/// Элемент списка технологий.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Technology {
    pub name: &'static str,
    pub description: &'static str,
    pub url: &'static str,
}

/// Статическое содержимое экрана About.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AboutContent {
    pub title: &'static str,
    pub description: &'static str,
    pub technologies_title: &'static str,
    pub technologies: &'static [Technology],
    pub footer: &'static str,
}

impl AboutContent {
    pub fn technology(&self, index: usize) -> Option<&'static Technology> {
        self.technologies.get(index)
    }
}

pub static ABOUT: AboutContent = AboutContent {
    title: "About This App",
    description: "This is a simple blog post reading application that uses the JSONPlaceholder API.",
    technologies_title: "Technologies Used",
    technologies: &[
        Technology {
            name: "Rust",
            description: "A language empowering everyone to build reliable and efficient software",
            url: "https://www.rust-lang.org/",
        },
        Technology {
            name: "Tokio",
            description: "An asynchronous runtime for the Rust programming language",
            url: "https://tokio.rs/",
        },
        Technology {
            name: "reqwest",
            description: "An ergonomic, batteries-included HTTP client",
            url: "https://docs.rs/reqwest/",
        },
        Technology {
            name: "serde",
            description: "A framework for serializing and deserializing Rust data structures",
            url: "https://serde.rs/",
        },
        Technology {
            name: "clap",
            description: "Command line argument parser",
            url: "https://docs.rs/clap/",
        },
        Technology {
            name: "tracing",
            description: "Application-level tracing and structured logging",
            url: "https://docs.rs/tracing/",
        },
        Technology {
            name: "JSONPlaceholder",
            description: "Free fake API for testing and prototyping",
            url: "https://jsonplaceholder.typicode.com/",
        },
    ],
    footer: "Open any technology to see where to learn more about it.",
};
