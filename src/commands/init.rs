//! Initialize a new portfolio site

use anyhow::{bail, Result};
use chrono::Local;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Site
title: Portfolio
description: my portfolio website
language: en
timezone: ''
author:
  name: John Doe
  bio: ''
  # avatar: /images/avatar.jpg

# URL
url: http://example.com
root: /

# Directory
content_dir: content
posts_dir: posts
projects_dir: projects
public_dir: public
static_dir: static

# Content
include:
  - '*.md'
  - '*.markdown'
render_drafts: false
read_timeout_ms: 5000
date_format: MMMM DD, YYYY

# Home page
home:
  # recent_posts: 5
  recent_projects: 2

# Navigation
menu:
  Posts: /posts
  Projects: /projects
  Contact: /contact

# light, dark or system
theme:
  default: system

newsletter:
  enable: true
  heading: Stay Updated
  blurb: Get our latest news delivered to your inbox.
  # action: https://example.us1.list-manage.com/subscribe/post
  placeholder: name@example.com
  button: Subscribe

# contact:
#   email: you@example.com
#   github: your-username
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    if target_dir.join("_config.yml").exists() {
        bail!("A site already exists in {:?}", target_dir);
    }

    fs::create_dir_all(target_dir.join("content/posts"))?;
    fs::create_dir_all(target_dir.join("content/projects"))?;
    fs::create_dir_all(target_dir.join("static/images"))?;

    fs::write(target_dir.join("_config.yml"), CONFIG)?;

    let now = Local::now().format("%Y-%m-%d %H:%M:%S");

    let sample_post = format!(
        r#"---
title: Hello World
date: {now}
tags: [welcome]
---

Welcome to your new portfolio. This is your very first post.

<!-- more -->

## Quick Start

Create a new post:

```bash
$ folio new post "My New Post"
```

Preview the site while you write:

```bash
$ folio server
```

Build the static site into `public/`:

```bash
$ folio generate
```
"#
    );
    fs::write(target_dir.join("content/posts/hello-world.md"), sample_post)?;

    let sample_project = format!(
        r#"---
title: Portfolio Site
date: {now}
description: The site you are looking at, built from markdown.
link: https://github.com/you/portfolio
tags: [rust, web]
---

Posts and projects are plain markdown files with front-matter.
"#
    );
    fs::write(
        target_dir.join("content/projects/portfolio-site.md"),
        sample_project,
    )?;

    Ok(())
}
