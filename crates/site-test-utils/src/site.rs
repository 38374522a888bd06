//! Seeded static-site fixtures

use site_store::MemoryStore;

pub const HOME_LAYOUT: &str = "_layouts/home.html";
pub const ABOUT_PAGE: &str = "about.html";
pub const CONTACT_PAGE: &str = "contact.html";
pub const INDEX_PAGE: &str = "index.html";
pub const SITE_CONFIG: &str = "_config.yml";
pub const POSTS_DIR: &str = "_posts";

/// Home layout with a named about section
pub const HOME_LAYOUT_HTML: &str = r#"---
layout: default
---
<section class="intro">
  <h1>Welcome</h1>
</section>
<div class="about">
<!-- about-section -->
We write about indigenous plants.
<!-- /about-section -->
</div>
<footer>{{ site.title }}</footer>
"#;

/// Home layout from before named sections existed
pub const LEGACY_HOME_LAYOUT_HTML: &str = r#"<div class="about">
  <h1><u>About</u></h1>
  <p>Old style about text.</p>
</div>
"#;

pub const ABOUT_PAGE_HTML: &str = "---\nlayout: page\ntitle: About\ndescription: Who we are\nbackground: /img/bg-about.jpg\n---\n\n<p>About us.</p>";

pub const SITE_CONFIG_YML: &str = "title: Fynbos Notes\nemail: hello@example.com\nactive_theme: default\nmarkdown: kramdown\npaginate: 10\npaginate_path: /posts/page:num/\n";

/// Front matter post text
pub fn post(title: &str, date: &str, body: &str) -> String {
    format!("---\nlayout: post\ntitle: {title}\ndate: '{date}'\n---\n\n{body}")
}

/// Path of a post file in the posts directory
pub fn post_path(name: &str) -> String {
    format!("{POSTS_DIR}/{name}")
}

/// Builder for a seeded [`MemoryStore`]
#[derive(Debug, Default)]
pub struct SiteFixture {
    files: Vec<(String, String)>,
}

impl SiteFixture {
    /// An empty repository
    pub fn empty() -> Self {
        Self::default()
    }

    /// Home layout, about and contact pages, index and `_config.yml`, no posts
    pub fn standard() -> Self {
        Self::empty()
            .with_file(INDEX_PAGE, "---\nlayout: home\n---\n")
            .with_file(HOME_LAYOUT, HOME_LAYOUT_HTML)
            .with_file(ABOUT_PAGE, ABOUT_PAGE_HTML)
            .with_file(
                CONTACT_PAGE,
                "---\nlayout: page\ntitle: Contact\n---\n\n<form></form>",
            )
            .with_file(SITE_CONFIG, SITE_CONFIG_YML)
            .with_file("css/site.css", "body {}")
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Add a post named `<date>-<slug>.md`
    pub fn with_post(self, date: &str, slug: &str, title: &str) -> Self {
        let name = format!("{date}-{slug}.md");
        self.with_file(post_path(&name), post(title, date, "Post body."))
    }

    /// Add `count` posts dated on consecutive days of January 2024
    pub fn with_posts(self, count: usize) -> Self {
        (1..=count).fold(self, |fixture, day| {
            let date = format!("2024-01-{day:02}");
            fixture.with_post(&date, &format!("post-{day}"), &format!("Post {day}"))
        })
    }

    pub fn build(self) -> MemoryStore {
        MemoryStore::with_documents(self.files)
    }
}

/// Standard site with three posts
pub fn sample_site() -> MemoryStore {
    SiteFixture::standard().with_posts(3).build()
}
