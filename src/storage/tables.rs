use redb::TableDefinition;

/// Draft metadata: id -> Row (msgpack) with columns `id`, `title`
pub const BLOG_DRAFT: &str = "blog_draft";

/// Published metadata: id -> Row (msgpack) with columns `id`, `title`, `category`, `published_at`
pub const BLOG_CONTENT: &str = "blog_content";

/// Every table the metadata store knows about.
pub const TABLES: [&str; 2] = [BLOG_DRAFT, BLOG_CONTENT];

pub const COL_ID: &str = "id";
pub const COL_TITLE: &str = "title";
pub const COL_CATEGORY: &str = "category";
pub const COL_PUBLISHED_AT: &str = "published_at";

/// redb definition for a metadata table. All tables share the same layout,
/// keyed by the row's primary key.
pub const fn table_def(name: &str) -> TableDefinition<'_, &'static str, &'static [u8]> {
    TableDefinition::new(name)
}
