/// Built-in URL + schema pair offered in the examples menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub url: &'static str,
    pub schema: &'static str,
}

pub const PRESETS: [Preset; 3] = [
    Preset {
        name: "YC Jobs",
        url: "https://www.ycombinator.com/jobs",
        schema: "{\n  job_categories[]\n  jobs[] {\n    company_name\n    role\n  }\n}",
    },
    Preset {
        name: "Books to Scrape",
        url: "https://books.toscrape.com/",
        schema: "{\n  products[] {\n    product_name\n    rating\n    price\n  }\n}",
    },
    Preset {
        name: "Amazon iPhone 17",
        url: "https://www.amazon.com/s?k=iphone+17",
        schema: "{\n  products[] {\n    product_name\n    price\n    rating\n    \
                 rating_count\n  }\n}",
    },
];

/// The session opens on the first preset.
pub const DEFAULT_PRESET: Preset = PRESETS[0];
