//! GraphQL query documents
//!
//! The search string is a variable, not baked into the document, so a
//! cursor always stays tied to the exact query+variables pair that
//! produced it.

/// Page of repository search results, most-starred first.
pub const SEARCH_REPOSITORIES: &str = r#"
query ($searchQuery: String!, $cursor: String, $pageSize: Int!) {
  search(query: $searchQuery, type: REPOSITORY, first: $pageSize, after: $cursor) {
    edges {
      node {
        ... on Repository {
          name
          url
          createdAt
          pushedAt
          isFork
          isArchived
          stargazerCount
          owner { login }
          releases { totalCount }
          defaultBranchRef { name }
          pullRequests(states: [MERGED, CLOSED]) { totalCount }
        }
      }
    }
    pageInfo { hasNextPage endCursor }
  }
}
"#;

/// Page of one repository's pull requests, newest first. Open PRs are
/// never requested; the states filter is part of the input scope.
pub const REPOSITORY_PULL_REQUESTS: &str = r#"
query ($owner: String!, $name: String!, $cursor: String, $pageSize: Int!) {
  repository(owner: $owner, name: $name) {
    pullRequests(
      states: [MERGED, CLOSED]
      orderBy: {field: CREATED_AT, direction: DESC}
      first: $pageSize
      after: $cursor
    ) {
      totalCount
      pageInfo { hasNextPage endCursor }
      nodes {
        number
        title
        url
        state
        createdAt
        closedAt
        mergedAt
        author { login }
        bodyText
        reviews { totalCount }
        participants { totalCount }
        comments { totalCount }
        additions
        deletions
        changedFiles
      }
    }
  }
}
"#;
