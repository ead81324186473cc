// Sample data for development databases

use snippets_core::{CredentialStore, NewSnippet, Result, SnippetFilter, SnippetStore};

use super::bootstrap::ensure_admin_user;
use crate::auth::AdminConfig;

/// Username of the sample account for Basic authentication
pub const SAMPLE_USERNAME: &str = "admin";

/// Password of the sample account. Development data only.
pub const SAMPLE_PASSWORD: &str = "snippets123";

/// A built-in example snippet
pub struct SampleSnippet {
    pub title: &'static str,
    pub language: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub code: &'static str,
}

impl SampleSnippet {
    fn to_new_snippet(&self) -> NewSnippet {
        NewSnippet {
            title: self.title.to_string(),
            code: self.code.to_string(),
            language: self.language.to_string(),
            description: Some(self.description.to_string()),
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

pub const SAMPLE_SNIPPETS: &[SampleSnippet] = &[
    SampleSnippet {
        title: "Flask Basic Route",
        language: "python",
        description: "A simple Flask route that returns JSON data.",
        tags: &["flask", "web", "beginner"],
        code: r#"from flask import Flask, jsonify

app = Flask(__name__)

@app.route('/api/hello')
def hello():
    return jsonify({'message': 'Hello, World!', 'status': 'success'})

if __name__ == '__main__':
    app.run(debug=True)"#,
    },
    SampleSnippet {
        title: "Python List Comprehension Examples",
        language: "python",
        description: "Common list comprehension patterns in Python.",
        tags: &["python", "beginner", "utility"],
        code: r#"squares = [x**2 for x in range(10)]
evens = [x for x in range(20) if x % 2 == 0]

matrix = [[1, 2, 3], [4, 5, 6], [7, 8, 9]]
flat = [num for row in matrix for num in row]

word_lengths = {word: len(word) for word in ['hello', 'world', 'python']}"#,
    },
    SampleSnippet {
        title: "JavaScript Fetch API Wrapper",
        language: "javascript",
        description: "A reusable fetch wrapper with error handling and JSON parsing.",
        tags: &["javascript", "api", "utility"],
        code: r#"async function fetchJSON(url, options = {}) {
  const response = await fetch(url, {
    ...options,
    headers: { 'Content-Type': 'application/json', ...options.headers },
  });

  if (!response.ok) {
    const error = new Error(`HTTP ${response.status}: ${response.statusText}`);
    error.status = response.status;
    throw error;
  }

  return response.json();
}"#,
    },
    SampleSnippet {
        title: "SQL Common Table Expression (CTE)",
        language: "sql",
        description: "Using CTEs for readable complex queries with employee hierarchy example.",
        tags: &["sql", "database", "intermediate"],
        code: r#"WITH RECURSIVE employee_hierarchy AS (
    SELECT id, name, manager_id, 1 AS level
    FROM employees
    WHERE manager_id IS NULL

    UNION ALL

    SELECT e.id, e.name, e.manager_id, eh.level + 1
    FROM employees e
    INNER JOIN employee_hierarchy eh ON e.manager_id = eh.id
)
SELECT id, name, level FROM employee_hierarchy ORDER BY level, name;"#,
    },
    SampleSnippet {
        title: "CSS Flexbox Centering",
        language: "css",
        description: "Different ways to center elements using CSS Flexbox.",
        tags: &["css", "layout", "beginner"],
        code: r#".container-center {
  display: flex;
  justify-content: center;
  align-items: center;
  min-height: 100vh;
}

.container-column {
  display: flex;
  flex-direction: column;
  align-items: center;
  gap: 16px;
}"#,
    },
    SampleSnippet {
        title: "Bash Script Template",
        language: "bash",
        description: "A robust bash script template with error handling and argument parsing.",
        tags: &["bash", "devops", "utility"],
        code: r#"#!/bin/bash
set -euo pipefail

VERBOSE=false
OUTPUT_DIR="./output"

while [[ $# -gt 0 ]]; do
    case $1 in
        -o|--output) OUTPUT_DIR="$2"; shift 2 ;;
        -v|--verbose) VERBOSE=true; shift ;;
        *) INPUT_FILE="$1"; shift ;;
    esac
done

mkdir -p "$OUTPUT_DIR""#,
    },
    SampleSnippet {
        title: "Docker Compose - Python Web App",
        language: "yaml",
        description: "Docker Compose configuration for a Python web app with PostgreSQL.",
        tags: &["docker", "devops", "python"],
        code: r#"services:
  web:
    build: .
    ports:
      - "5000:5000"
    environment:
      - DATABASE_URL=postgresql://user:password@db:5432/appdb
    depends_on:
      - db

  db:
    image: postgres:15-alpine
    environment:
      - POSTGRES_USER=user
      - POSTGRES_PASSWORD=password
      - POSTGRES_DB=appdb"#,
    },
    SampleSnippet {
        title: "Python Context Manager",
        language: "python",
        description: "Custom context manager for timing code execution.",
        tags: &["python", "intermediate", "utility"],
        code: r#"import time
from contextlib import contextmanager

@contextmanager
def timer(label="Operation"):
    start = time.perf_counter()
    try:
        yield
    finally:
        print(f"{label} took {time.perf_counter() - start:.4f} seconds")"#,
    },
];

/// Insert the sample snippets unless the store already has any.
///
/// Returns the number of snippets created.
pub async fn seed_sample_snippets(store: &dyn SnippetStore) -> Result<usize> {
    let existing = store.list_snippets(&SnippetFilter::default()).await?;
    if !existing.is_empty() {
        tracing::info!("Store already has snippets, skipping seed");
        return Ok(0);
    }

    for sample in SAMPLE_SNIPPETS {
        store.create_snippet(sample.to_new_snippet()).await?;
    }

    tracing::info!(count = SAMPLE_SNIPPETS.len(), "Seeded sample snippets");
    Ok(SAMPLE_SNIPPETS.len())
}

/// Create the sample `admin` account unless the username is taken.
///
/// Returns true if the account was created.
pub async fn seed_sample_user(store: &dyn CredentialStore) -> Result<bool> {
    let sample = AdminConfig {
        username: SAMPLE_USERNAME.to_string(),
        password: SAMPLE_PASSWORD.to_string(),
    };
    let created = ensure_admin_user(store, &sample).await?;
    if created {
        tracing::warn!(
            username = SAMPLE_USERNAME,
            "Created sample user with a well-known password"
        );
    }
    Ok(created)
}
