// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! R source fixtures covering the shapes the detector has to survive:
//! plain calls, formatted multi-line calls, glue interpolation, named
//! arguments, comments, and adversarial quoting.

/// One direct query on a single line
pub const SIMPLE_QUERY: &str = r#"con <- dbConnect(RSQLite::SQLite(), ":memory:")
res <- dbGetQuery(con, "SELECT id, name FROM users")
"#;

/// A formatter has spread the call over several lines
pub const MULTILINE_CALL: &str = r#"res <- dbGetQuery(
  con,
  "
  SELECT id, name
  FROM users
  WHERE active = 1
"
)
"#;

/// Glue-style interpolation with a named connection argument
pub const GLUE_CALL: &str = r#"q <- glue_sql("SELECT {cols} FROM {tbl} WHERE id = {id}", .con = con)
"#;

/// Named arguments that must never classify as SQL
pub const NAMED_ARGS: &str = r#"res <- dbGetQuery(con, "SELECT 1", prudence = "thrifty")
out <- sqlInterpolate(con, sql = "SELECT * FROM t WHERE x = ?x", x = 1)
"#;

/// A commented-out query above a live one
pub const COMMENTED: &str = r#"# old: dbGetQuery(con, "SELECT * FROM legacy")
res <- dbGetQuery(con, "SELECT * FROM current")
"#;

/// A glue call nested inside a direct call
pub const NESTED_CALLS: &str = r#"res <- dbGetQuery(con, glue_sql("SELECT * FROM {tbl}", .con = con))
"#;

/// Escaped quotes and SQL-side quoting inside the literal
pub const TRICKY_QUOTES: &str = r#"res <- dbGetQuery(con, "SELECT \"id\", '#not a comment' FROM t WHERE s = '('")
"#;

/// A script with no SQL at all
pub const NO_SQL: &str = r#"x <- c(1, 2, 3)
label <- "not a query"
mean(x)
"#;
