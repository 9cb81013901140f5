//! Bitbucket Cloud adapter
//!
//! Talks to the Bitbucket REST API 2.0 with a repository access token.
//! API reference: https://developer.atlassian.com/cloud/bitbucket/rest/intro

use crate::error::RemoteError;
use crate::remote::{
    FileChanges, HttpClient, PullRequest, PullRequestCreate, RemoteBranch, RemoteRepository,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Bitbucket Cloud API base URL
pub const BITBUCKET_API_URL: &str = "https://api.bitbucket.org/2.0";

/// Host name used in error messages
const HOST_NAME: &str = "Bitbucket";

/// Repository information (only the fields we use)
#[derive(Debug, Deserialize)]
struct RepoResponse {
    mainbranch: MainBranchRef,
}

#[derive(Debug, Deserialize)]
struct MainBranchRef {
    name: String,
}

/// Branch information (only the fields we use)
#[derive(Debug, Deserialize)]
struct BranchResponse {
    name: String,
    target: CommitRef,
}

#[derive(Debug, Serialize, Deserialize)]
struct CommitRef {
    hash: String,
}

/// Pull request information (only the fields we use)
#[derive(Debug, Deserialize)]
struct PullRequestResponse {
    id: u64,
    title: String,
    links: PullRequestLinks,
}

#[derive(Debug, Deserialize)]
struct PullRequestLinks {
    html: Href,
}

#[derive(Debug, Deserialize)]
struct Href {
    href: String,
}

#[derive(Debug, Serialize)]
struct CreateBranchBody<'a> {
    name: &'a str,
    target: CommitRef,
}

#[derive(Debug, Serialize)]
struct CreatePullRequestBody<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    source: BranchSelector<'a>,
    destination: BranchSelector<'a>,
}

#[derive(Debug, Serialize)]
struct BranchSelector<'a> {
    branch: BranchName<'a>,
}

#[derive(Debug, Serialize)]
struct BranchName<'a> {
    name: &'a str,
}

impl<'a> BranchSelector<'a> {
    fn named(name: &'a str) -> Self {
        Self {
            branch: BranchName { name },
        }
    }
}

/// Thin wrapper over the Bitbucket HTTP API
#[derive(Clone)]
pub struct BitbucketApiClient {
    http: HttpClient,
    base_url: String,
    token: String,
}

impl BitbucketApiClient {
    /// Create a client against an API base URL, usually [`BITBUCKET_API_URL`]
    pub fn new(
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, RemoteError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http: HttpClient::new(HOST_NAME)?,
            base_url,
            token: token.into(),
        })
    }

    /// Build the URL of a repository resource
    fn repo_url(&self, workspace: &str, repo_slug: &str) -> String {
        format!("{}/repositories/{}/{}", self.base_url, workspace, repo_slug)
    }

    /// Fetch the name of the repository's main branch
    pub async fn main_branch_name(
        &self,
        workspace: &str,
        repo_slug: &str,
    ) -> Result<String, RemoteError> {
        let request = self
            .http
            .inner()
            .get(self.repo_url(workspace, repo_slug))
            .bearer_auth(&self.token);
        let repo: RepoResponse = self.http.json(request).await?;
        Ok(repo.mainbranch.name)
    }

    /// Fetch a branch and its head commit
    pub async fn get_branch(
        &self,
        workspace: &str,
        repo_slug: &str,
        branch_name: &str,
    ) -> Result<RemoteBranch, RemoteError> {
        let url = format!(
            "{}/refs/branches/{}",
            self.repo_url(workspace, repo_slug),
            branch_name
        );
        let request = self.http.inner().get(url).bearer_auth(&self.token);
        let branch: BranchResponse = self.http.json(request).await?;
        Ok(RemoteBranch::new(branch.name, branch.target.hash))
    }

    /// Create a branch pointing at `from_commit`
    pub async fn create_branch(
        &self,
        workspace: &str,
        repo_slug: &str,
        name: &str,
        from_commit: &str,
    ) -> Result<RemoteBranch, RemoteError> {
        let url = format!("{}/refs/branches", self.repo_url(workspace, repo_slug));
        let body = CreateBranchBody {
            name,
            target: CommitRef {
                hash: from_commit.to_string(),
            },
        };
        let request = self
            .http
            .inner()
            .post(url)
            .bearer_auth(&self.token)
            .json(&body);
        let branch: BranchResponse = self.http.json(request).await?;
        Ok(RemoteBranch::new(branch.name, branch.target.hash))
    }

    /// Download the raw contents of a file at a given commit
    pub async fn get_file_contents(
        &self,
        workspace: &str,
        repo_slug: &str,
        commit: &str,
        path: &str,
    ) -> Result<String, RemoteError> {
        let url = format!(
            "{}/src/{}/{}",
            self.repo_url(workspace, repo_slug),
            commit,
            path.trim_start_matches('/')
        );
        let request = self.http.inner().get(url).bearer_auth(&self.token);
        let response = self.http.send_raw(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RemoteError::file_not_found(path));
        }
        let response = self.http.ensure_success(response).await?;
        self.http.text(response).await
    }

    /// Create one commit on `branch` replacing the given files
    pub async fn create_file_commit(
        &self,
        workspace: &str,
        repo_slug: &str,
        files: &FileChanges,
        message: &str,
        author: &str,
        branch: &str,
    ) -> Result<(), RemoteError> {
        let url = format!("{}/src", self.repo_url(workspace, repo_slug));
        let request = self
            .http
            .inner()
            .post(url)
            .bearer_auth(&self.token)
            .multipart(commit_form(files, message, author, branch));
        self.http.send(request).await?;
        Ok(())
    }

    /// Open a pull request
    pub async fn open_pull_request(
        &self,
        workspace: &str,
        repo_slug: &str,
        request: &PullRequestCreate,
        target_branch: &str,
    ) -> Result<PullRequest, RemoteError> {
        let url = format!("{}/pullrequests", self.repo_url(workspace, repo_slug));
        let body = pull_request_body(request, target_branch);
        let http_request = self
            .http
            .inner()
            .post(url)
            .bearer_auth(&self.token)
            .json(&body);
        let response: PullRequestResponse = self.http.json(http_request).await?;
        Ok(PullRequest {
            id: response.id,
            link: response.links.html.href,
            title: response.title,
        })
    }
}

/// Multipart body for the `src` endpoint: one part per file plus commit metadata
fn commit_form(files: &FileChanges, message: &str, author: &str, branch: &str) -> Form {
    let mut form = Form::new();
    for (path, contents) in files {
        let file_name = path.rsplit('/').next().unwrap_or(path).to_string();
        let part = Part::bytes(contents.clone().into_bytes()).file_name(file_name);
        form = form.part(path.clone(), part);
    }
    form.text("message", message.to_string())
        .text("author", author.to_string())
        .text("branch", branch.to_string())
}

fn pull_request_body<'a>(
    request: &'a PullRequestCreate,
    target_branch: &'a str,
) -> CreatePullRequestBody<'a> {
    CreatePullRequestBody {
        title: &request.title,
        description: request.description.as_deref(),
        source: BranchSelector::named(&request.source_branch),
        destination: BranchSelector::named(target_branch),
    }
}

/// An authenticated Bitbucket instance used to open repositories
pub struct BitbucketHost {
    client: BitbucketApiClient,
}

impl BitbucketHost {
    /// Create a host with the given API client
    pub fn new(client: BitbucketApiClient) -> Self {
        Self { client }
    }

    /// Resolve a repository and its main branch head
    pub async fn get_repo(
        &self,
        workspace: &str,
        repo_slug: &str,
    ) -> Result<BitbucketRepository, RemoteError> {
        let main_branch_name = self.client.main_branch_name(workspace, repo_slug).await?;
        let main_branch = self
            .client
            .get_branch(workspace, repo_slug, &main_branch_name)
            .await?;

        Ok(BitbucketRepository {
            client: self.client.clone(),
            workspace: workspace.to_string(),
            repo_slug: repo_slug.to_string(),
            main_branch,
        })
    }
}

/// A Bitbucket repository pinned to its main branch head at open time
pub struct BitbucketRepository {
    client: BitbucketApiClient,
    workspace: String,
    repo_slug: String,
    main_branch: RemoteBranch,
}

#[async_trait]
impl RemoteRepository for BitbucketRepository {
    fn provider_name(&self) -> &'static str {
        HOST_NAME
    }

    fn main_branch(&self) -> &RemoteBranch {
        &self.main_branch
    }

    async fn create_branch(
        &self,
        name: &str,
        from_commit: &str,
    ) -> Result<RemoteBranch, RemoteError> {
        self.client
            .create_branch(&self.workspace, &self.repo_slug, name, from_commit)
            .await
    }

    async fn download_file_contents(&self, path: &str) -> Result<String, RemoteError> {
        self.client
            .get_file_contents(
                &self.workspace,
                &self.repo_slug,
                &self.main_branch.head,
                path,
            )
            .await
    }

    async fn create_commit(
        &self,
        message: &str,
        files: &FileChanges,
        branch: &RemoteBranch,
        author: &str,
    ) -> Result<(), RemoteError> {
        self.client
            .create_file_commit(
                &self.workspace,
                &self.repo_slug,
                files,
                message,
                author,
                &branch.name,
            )
            .await
    }

    async fn open_pull_request(
        &self,
        request: &PullRequestCreate,
    ) -> Result<PullRequest, RemoteError> {
        let target = request.target_or(&self.main_branch.name).to_string();
        self.client
            .open_pull_request(&self.workspace, &self.repo_slug, request, &target)
            .await
    }
}
