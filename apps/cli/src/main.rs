use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use minide_import::{read_archive, read_folder, read_single_file, ImportBatch, ImportFailure};
use minide_project::{
    load_bundle, save_bundle, EditorTab, ImportOrigin, ProjectSession, SessionFileStore,
};
use minide_settings::{Preferences, PreferencesStore};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "minide-cli",
    about = "Project commands for the MinIDE mini IDE",
    author,
    version
)]
struct Cli {
    /// 指定工作區根目錄；預設為目前目錄。 / Workspace root (defaults to current directory).
    #[arg(long, global = true, value_name = "PATH")]
    workspace: Option<PathBuf>,
    /// 工作階段檔案；預設為 <workspace>/.minide/session.json。 / Session file holding the working project.
    #[arg(long, global = true, value_name = "FILE")]
    session: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 建立新專案（預設三個檔案）。 / Start a new project from the three default files.
    New,
    /// 清除全部並重設。 / Clear everything and reset to the default project.
    Clear,
    /// 開啟單一檔案並進入編輯。 / Add a single file to the project and open it in the editor.
    Open(OpenArgs),
    /// 開啟整個資料夾。 / Import every file of a folder, keyed as <folder>/<relative path>.
    OpenFolder(OpenFolderArgs),
    /// 解壓 zip 檔並匯入。 / Extract a zip archive into the project.
    ImportZip(ImportZipArgs),
    /// 匯入專案封包。 / Replace the project with a previously exported bundle.
    ImportBundle(ImportBundleArgs),
    /// 列出專案檔案。 / List project files in path order.
    List,
    /// 輸出檔案內容。 / Print the content of a project file.
    Cat(CatArgs),
    /// 選取檔案（累加）。 / Add files to the selection.
    Select(SelectArgs),
    /// 在編輯器中開啟檔案。 / Bind the editor to a file or a canonical tab.
    Edit(EditArgs),
    /// 儲存編輯器內容。 / Save the editor buffer back into the project.
    Save(SaveArgs),
    /// 另存為資料夾。 / Nest every file under a new folder name and rename the project.
    SaveAs(SaveAsArgs),
    /// 關閉選取的檔案。 / Close (remove) the selected files.
    Close,
    /// 複製選取的檔案。 / Copy the selected files into a folder.
    Copy(CopyArgs),
    /// 建立資料夾。 / Create a folder with a README placeholder.
    Mkdir(MkdirArgs),
    /// 刪除選取的檔案。 / Delete the selected files.
    Delete,
    /// 產生分享網址。 / Generate a share reference for the project.
    Share(ShareArgs),
    /// 匯出部署封包。 / Export the project as a JSON bundle.
    Export(ExportArgs),
    /// 產生預覽文件。 / Compose the HTML/CSS/JS preview document.
    Preview(PreviewArgs),
    /// 顯示狀態列訊息。 / Show the last status message.
    Status,
    /// 匯入/匯出偏好設定。 / Show, import or export preferences.
    #[command(subcommand)]
    Preferences(PreferencesCommand),
}

#[derive(Args)]
struct OpenArgs {
    /// 要開啟的檔案。 / File to open.
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

#[derive(Args)]
struct OpenFolderArgs {
    /// 要匯入的資料夾。 / Folder to import.
    #[arg(value_name = "DIR")]
    dir: PathBuf,
}

#[derive(Args)]
struct ImportZipArgs {
    /// zip 檔路徑。 / Zip archive to extract.
    #[arg(value_name = "ZIP")]
    archive: PathBuf,
}

#[derive(Args)]
struct ImportBundleArgs {
    /// 封包檔案。 / Bundle JSON produced by `export`.
    #[arg(value_name = "FILE")]
    bundle: PathBuf,
}

#[derive(Args)]
struct CatArgs {
    /// 專案內的路徑。 / Project path to print.
    path: String,
}

#[derive(Args)]
struct SelectArgs {
    /// 要選取的專案路徑。 / Project paths to select.
    #[arg(required = true)]
    paths: Vec<String>,
}

#[derive(Args)]
struct EditArgs {
    /// 要編輯的專案路徑。 / Project path to edit.
    path: Option<String>,
    /// 切換到標準分頁。 / Switch to a canonical tab instead of a path.
    #[arg(long, value_enum, conflicts_with = "path")]
    tab: Option<TabChoice>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TabChoice {
    Html,
    Css,
    #[value(name = "js", alias = "javascript")]
    JavaScript,
}

impl From<TabChoice> for EditorTab {
    fn from(choice: TabChoice) -> Self {
        match choice {
            TabChoice::Html => EditorTab::Html,
            TabChoice::Css => EditorTab::Css,
            TabChoice::JavaScript => EditorTab::JavaScript,
        }
    }
}

#[derive(Args)]
struct SaveArgs {
    /// 以指定文字取代編輯器內容。 / Replace the editor buffer with this text before saving.
    #[arg(long, value_name = "TEXT", conflicts_with = "from")]
    text: Option<String>,
    /// 從檔案讀入編輯器內容。 / Replace the editor buffer with a file's content before saving.
    #[arg(long, value_name = "FILE")]
    from: Option<PathBuf>,
}

#[derive(Args)]
struct SaveAsArgs {
    /// 新資料夾名稱；預設為目前專案名稱。 / New folder name (defaults to the project name).
    name: Option<String>,
}

#[derive(Args)]
struct CopyArgs {
    /// 目的資料夾；預設取自偏好設定。 / Destination folder (defaults to the preference value).
    destination: Option<String>,
}

#[derive(Args)]
struct MkdirArgs {
    /// 資料夾名稱。 / Folder name.
    name: String,
}

#[derive(Args)]
struct ShareArgs {
    /// 覆寫分享網址的主機。 / Override the base URL used for the reference.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
}

#[derive(Args)]
struct ExportArgs {
    /// 輸出檔案；預設為 <workspace>/<project>-bundle.json。 / Destination file.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct PreviewArgs {
    /// 輸出檔案；略過則輸出至標準輸出。 / Destination file; prints to stdout when omitted.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum PreferencesCommand {
    /// 顯示目前偏好設定。 / Print current preferences.
    Show,
    /// 匯出目前偏好設定。 / Export current preferences.
    Export(PreferencesExportArgs),
    /// 匯入偏好設定 JSON。 / Import preferences from JSON.
    Import(PreferencesImportArgs),
}

#[derive(Args)]
struct PreferencesExportArgs {
    /// 輸出檔案路徑。 / Destination file path.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
}

#[derive(Args)]
struct PreferencesImportArgs {
    /// 輸入檔案路徑。 / Source preferences JSON.
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let Cli {
        workspace,
        session,
        command,
    } = Cli::parse();
    let workspace_root = resolve_workspace(workspace)?;
    let prefs_path = preferences_path(&workspace_root);
    let mut preferences = PreferencesStore::load(&prefs_path)
        .with_context(|| format!("failed to load preferences from {}", prefs_path.display()))?;
    init_logging(&preferences.preferences().logging.level);

    let command = match command {
        Commands::Preferences(subcommand) => {
            return execute_preferences_command(subcommand, &mut preferences)
        }
        other => other,
    };

    let session_path = match session {
        Some(path) => resolve_input_path(&path)?,
        None => default_session_path(&workspace_root),
    };
    let session_store = SessionFileStore::new(&session_path);
    let prefs = preferences.preferences().clone();
    let mut project = load_session(&session_store, &prefs)?;

    execute_command(command, &mut project, &prefs, &workspace_root).await?;

    session_store
        .save(&project.snapshot())
        .with_context(|| format!("failed to save session {}", session_path.display()))?;
    Ok(())
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_session(store: &SessionFileStore, prefs: &Preferences) -> Result<ProjectSession> {
    let default_name = prefs.project.default_name.as_str();
    let loaded = store
        .load()
        .with_context(|| format!("failed to load session {}", store.path().display()))?;
    Ok(match loaded {
        Some(snapshot) => {
            debug!(files = snapshot.files.len(), "restoring session");
            ProjectSession::from_snapshot(snapshot, default_name)
        }
        None => ProjectSession::new(default_name),
    })
}

async fn execute_command(
    command: Commands,
    project: &mut ProjectSession,
    prefs: &Preferences,
    workspace_root: &Path,
) -> Result<()> {
    match command {
        Commands::New => {
            project.new_project();
            println!("{}", project.status());
        }
        Commands::Clear => {
            project.clear_all();
            println!("{}", project.status());
        }
        Commands::Open(args) => open_file(args, project).await?,
        Commands::OpenFolder(args) => open_folder(args, project).await?,
        Commands::ImportZip(args) => import_zip(args, project).await?,
        Commands::ImportBundle(args) => {
            let path = resolve_input_path(&args.bundle)?;
            let bundle = load_bundle(&path)
                .with_context(|| format!("failed to read bundle {}", path.display()))?;
            project.import_bundle(bundle);
            println!("{}", project.status());
        }
        Commands::List => list_files(project),
        Commands::Cat(args) => {
            let content = project.read_file(&args.path)?;
            print!("{content}");
            if !content.ends_with('\n') {
                println!();
            }
        }
        Commands::Select(args) => {
            for path in &args.paths {
                project.select(path)?;
            }
            let selected: Vec<&str> = project.selection().iter().collect();
            println!("Selected: {}", selected.join(", "));
        }
        Commands::Edit(args) => {
            let tab = match (args.path, args.tab) {
                (Some(path), None) => project.open_in_editor(&path),
                (None, Some(choice)) => {
                    let tab = EditorTab::from(choice);
                    project.open_tab(tab);
                    tab
                }
                _ => bail!("specify a PATH or --tab <html|css|js>"),
            };
            println!("{} ({} tab)", project.status(), tab.as_str());
        }
        Commands::Save(args) => {
            let replacement = match (args.text, args.from) {
                (Some(text), _) => Some(text),
                (None, Some(path)) => {
                    let path = resolve_input_path(&path)?;
                    Some(
                        fs::read_to_string(&path)
                            .with_context(|| format!("failed to read {}", path.display()))?,
                    )
                }
                (None, None) => None,
            };
            if let Some(text) = replacement {
                project.set_buffer(text)?;
            }
            project.save()?;
            println!("{}", project.status());
        }
        Commands::SaveAs(args) => {
            let name = args
                .name
                .unwrap_or_else(|| project.project_name().to_string());
            project.save_as(&name)?;
            println!("{}", project.status());
        }
        Commands::Close => {
            project.close_selected()?;
            println!("{}", project.status());
        }
        Commands::Copy(args) => {
            let destination = args
                .destination
                .unwrap_or_else(|| prefs.project.default_copy_folder.clone());
            let copied = project.copy_selected(&destination)?;
            for (source, target) in &copied {
                println!("  {source} -> {target}");
            }
            println!("{}", project.status());
        }
        Commands::Mkdir(args) => {
            let path = project.new_folder(&args.name)?;
            println!("{} ({path})", project.status());
        }
        Commands::Delete => {
            project.delete_selected()?;
            println!("{}", project.status());
        }
        Commands::Share(args) => {
            let base_url = args
                .base_url
                .unwrap_or_else(|| prefs.share.base_url.clone());
            println!("{}", project.share_reference(&base_url)?);
        }
        Commands::Export(args) => {
            let bundle = project.export_bundle(Utc::now())?;
            let output = match args.output {
                Some(path) => resolve_input_path(&path)?,
                None => workspace_root.join(bundle.file_name()),
            };
            save_bundle(&output, &bundle)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!(
                "Exported {} files to {}",
                bundle.files.len(),
                output.display()
            );
        }
        Commands::Preview(args) => {
            let document = project.preview()?;
            match args.output {
                Some(path) => {
                    let output = resolve_input_path(&path)?;
                    if let Some(parent) = output.parent() {
                        fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create {}", parent.display()))?;
                    }
                    fs::write(&output, document)
                        .with_context(|| format!("failed to write {}", output.display()))?;
                    println!("Preview written to {}", output.display());
                }
                None => print!("{document}"),
            }
        }
        Commands::Status => println!("{}", project.status()),
        Commands::Preferences(_) => bail!("preferences commands do not use a project session"),
    }
    Ok(())
}

async fn open_file(args: OpenArgs, project: &mut ProjectSession) -> Result<()> {
    let source = resolve_input_path(&args.file)?;
    if !source.is_file() {
        bail!("file '{}' does not exist", source.display());
    }
    let file = read_single_file(&source)
        .await
        .with_context(|| format!("failed to open {}", source.display()))?;
    let tab = project.open_file(file)?;
    println!("{} ({} tab)", project.status(), tab.as_str());
    Ok(())
}

async fn open_folder(args: OpenFolderArgs, project: &mut ProjectSession) -> Result<()> {
    let source = resolve_input_path(&args.dir)?;
    if !source.is_dir() {
        bail!("folder '{}' does not exist", source.display());
    }
    let batch = read_folder(&source)
        .await
        .with_context(|| format!("failed to read folder {}", source.display()))?;
    apply_batch(project, ImportOrigin::Folder, batch);
    println!("{}", project.status());
    Ok(())
}

async fn import_zip(args: ImportZipArgs, project: &mut ProjectSession) -> Result<()> {
    let source = resolve_input_path(&args.archive)?;
    if !source.is_file() {
        bail!("zip file '{}' does not exist", source.display());
    }
    let batch = read_archive(&source)
        .await
        .with_context(|| format!("failed to extract {}", source.display()))?;
    apply_batch(project, ImportOrigin::Archive, batch);
    println!("{}", project.status());
    Ok(())
}

fn apply_batch(project: &mut ProjectSession, origin: ImportOrigin, batch: ImportBatch) {
    let ImportBatch { entries, failures } = batch;
    report_failures(&failures);
    project.import_files(origin, entries);
}

fn report_failures(failures: &[ImportFailure]) {
    for failure in failures {
        eprintln!("warning: {}: {}", failure.path, failure.reason);
    }
}

fn list_files(project: &ProjectSession) {
    let listing = project.store().list();
    println!("{} ({} files)", project.project_name(), listing.len());
    if listing.is_empty() {
        println!("  No files yet");
        return;
    }
    let editing = project.editor().path();
    for row in &listing {
        let mut markers = Vec::new();
        if project.selection().contains(&row.path) {
            markers.push("selected");
        }
        if editing == Some(row.path.as_str()) {
            markers.push("editing");
        }
        let suffix = if markers.is_empty() {
            String::new()
        } else {
            format!(" [{}]", markers.join(", "))
        };
        println!(
            "  {} {} ({}){}",
            row.kind.icon(),
            row.path,
            row.display_size(),
            suffix
        );
    }
}

fn execute_preferences_command(
    command: PreferencesCommand,
    store: &mut PreferencesStore,
) -> Result<()> {
    match command {
        PreferencesCommand::Show => {
            let prefs = store.preferences();
            println!("project.default_name = {}", prefs.project.default_name);
            println!(
                "project.default_copy_folder = {}",
                prefs.project.default_copy_folder
            );
            println!("share.base_url = {}", prefs.share.base_url);
            println!("logging.level = {}", prefs.logging.level);
            Ok(())
        }
        PreferencesCommand::Export(args) => {
            let output = resolve_input_path(&args.output)?;
            store
                .export_to(&output)
                .with_context(|| format!("failed to export preferences to {}", output.display()))?;
            println!("Exported preferences to {}", output.display());
            Ok(())
        }
        PreferencesCommand::Import(args) => {
            let input = resolve_input_path(&args.input)?;
            if !input.exists() {
                bail!("preferences file '{}' does not exist", input.display());
            }
            store
                .import_from(&input)
                .with_context(|| format!("failed to import preferences from {}", input.display()))?;
            println!("Imported preferences from {}", input.display());
            Ok(())
        }
    }
}

fn minide_dir(workspace_root: &Path) -> PathBuf {
    workspace_root.join(".minide")
}

fn preferences_path(workspace_root: &Path) -> PathBuf {
    minide_dir(workspace_root).join("preferences.json")
}

fn default_session_path(workspace_root: &Path) -> PathBuf {
    minide_dir(workspace_root).join("session.json")
}

fn resolve_workspace(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => resolve_input_path(&path),
        None => std::env::current_dir().context("determine current directory"),
    }
}

fn resolve_input_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("determine current directory")?
            .join(path))
    }
}
