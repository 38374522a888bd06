//! Site layout options

/// Where the dashboard finds things in the site repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardOptions {
    /// Directory holding blog posts
    pub posts_dir: String,
    /// Layout containing the home page about section
    pub home_layout: String,
    /// Standalone about page
    pub about_page: String,
    /// Named section id of the home about text
    pub about_section: String,
    /// Workflow that generates new articles
    pub generation_workflow: String,
    /// Page background used when a form leaves it blank
    pub default_background: String,
    /// How many posts the summary shows
    pub recent_posts: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            posts_dir: "_posts".to_string(),
            home_layout: "_layouts/home.html".to_string(),
            about_page: "about.html".to_string(),
            about_section: "about-section".to_string(),
            generation_workflow: "mainBlog.yml".to_string(),
            default_background: "/img/bg-about.jpg".to_string(),
            recent_posts: 10,
        }
    }
}
