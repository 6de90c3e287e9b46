use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use colored::*;
use dotenvy::dotenv;
use tracing::{error, info, Level};

use employee_records::clients::EmployeeApiClient;
use employee_records::config::EnvironmentConfig;
use employee_records::controllers::{DeleteOutcome, EmployeeListController, FetchOutcome};
use employee_records::models::{Department, EmployeeDraft, EmployeeField, EmploymentStatus};
use employee_records::services::{
    AuthService, Authenticator, EmployeeFormService, EmployeeGateway, FormOutcome,
};
use employee_records::state::{FileSessionStore, SessionStore};

const MAX_LOGIN_ATTEMPTS: u32 = 3;

struct Console {
    auth: Arc<AuthService>,
    api: EmployeeApiClient,
    list: EmployeeListController,
    form: EmployeeFormService,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    let level = config.log_level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    println!("{}", "👥 Employee Records Console".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    info!("🌐 API: {} ({})", config.api_base_url, config.environment);

    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(config.session_file.clone()));
    let api = EmployeeApiClient::new(&config, store.clone())?;
    let auth = Arc::new(AuthService::init(api.clone(), store).await?);

    if !ensure_logged_in(&auth).await? {
        println!("{}", "❌ No se pudo iniciar sesión.".bright_red());
        return Ok(());
    }

    let gateway: Arc<dyn EmployeeGateway> = Arc::new(api.clone());
    let console = Console {
        list: EmployeeListController::new(gateway.clone()),
        form: EmployeeFormService::new(gateway, auth.clone()),
        auth,
        api,
    };

    console.run().await
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

async fn ensure_logged_in(auth: &AuthService) -> Result<bool> {
    match auth.verify_session().await {
        Ok(Some(user)) => {
            println!("{} {}", "✅ Sesión restaurada para".bright_green(), user.username);
            return Ok(true);
        }
        Ok(None) => {}
        Err(e) => error!("⚠️ No se pudo verificar la sesión: {}", e),
    }

    println!("{}", "🔐 INICIAR SESIÓN".bright_cyan().bold());
    println!("{}", "=================".bright_cyan());
    for _ in 0..MAX_LOGIN_ATTEMPTS {
        let username = prompt("Username: ")?;
        let password = prompt("Password: ")?;
        match auth.login(&username, &password).await {
            Ok(user) => {
                println!("{} {}", "✅ Bienvenido,".bright_green(), user.username);
                return Ok(true);
            }
            Err(e) => println!("{} {}", "❌".bright_red(), e),
        }
    }
    Ok(false)
}

impl Console {
    async fn run(&self) -> Result<()> {
        self.report_fetch(self.list.fetch().await);
        self.print_page().await;

        loop {
            println!();
            println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
            println!("{}", "==================".bright_green());
            println!(" 1. 🔄 Recargar listado");
            println!(" 2. 🔍 Buscar");
            println!(" 3. 🏢 Filtrar por departamento");
            println!(" 4. 📌 Filtrar por estado");
            println!(" 5. ➡️  Página siguiente");
            println!(" 6. ⬅️  Página anterior");
            println!(" 7. ➕ Nuevo empleado");
            println!(" 8. ✏️  Editar empleado");
            println!(" 9. 🔁 Cambiar estado");
            println!("10. 🗑️  Eliminar empleado");
            println!("11. 📊 Estadísticas");
            println!("12. 🚪 Cerrar sesión y salir");
            println!(" 0. 👋 Salir");

            let choice = prompt("Selecciona una opción: ")?;
            match choice.as_str() {
                "1" => self.report_fetch(self.list.refresh().await),
                "2" => {
                    let text = prompt("Texto de búsqueda (vacío = todos): ")?;
                    self.report_fetch(self.list.set_search(text).await);
                }
                "3" => {
                    let department = self.pick_department()?;
                    self.report_fetch(self.list.set_department(department).await);
                }
                "4" => {
                    let status = self.pick_status()?;
                    self.report_fetch(self.list.set_status(status).await);
                }
                "5" => self.move_page(1).await,
                "6" => self.move_page(-1).await,
                "7" => self.create().await?,
                "8" => self.edit().await?,
                "9" => self.change_status().await?,
                "10" => self.delete().await?,
                "11" => self.statistics().await,
                "12" => {
                    self.auth.logout().await?;
                    println!("{}", "👋 Sesión cerrada. ¡Hasta luego!".bright_green());
                    break;
                }
                "0" => {
                    println!("{}", "👋 ¡Hasta luego!".bright_green());
                    break;
                }
                _ => {
                    println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                    continue;
                }
            }

            if matches!(choice.as_str(), "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9" | "10") {
                self.print_page().await;
            }
        }

        Ok(())
    }

    fn report_fetch(&self, outcome: FetchOutcome) {
        if let FetchOutcome::Failed(message) = outcome {
            println!("{} {}", "❌".bright_red(), message.bright_red());
        }
    }

    async fn print_page(&self) {
        let snapshot = self.list.snapshot().await;
        println!();
        if let Some(user) = self.auth.current_user().await {
            let role = if user.is_admin { "admin" } else { "user" };
            println!("{}", format!("👤 {} ({})", user.username, role).bright_black());
        }
        if let Some(message) = &snapshot.last_error {
            println!("{} {}", "⚠️".bright_red(), message.bright_red());
        }
        if snapshot.page.items.is_empty() {
            println!("{}", "No employees found".bright_black());
            return;
        }

        for row in &snapshot.page.items {
            println!(
                "{:>5}  {:<10} {:<28} {:<20} {:<24} {}",
                row.id,
                row.employee_id,
                row.full_name,
                row.department.label(),
                row.position,
                row.employment_status.label()
            );
        }

        let window = snapshot.showing();
        println!(
            "{}",
            format!(
                "Showing {}–{} of {} employees (page {} of {})",
                window.from,
                window.to,
                window.total,
                snapshot.query.page_number,
                snapshot.total_pages()
            )
            .bright_blue()
        );
    }

    async fn move_page(&self, delta: i64) {
        let snapshot = self.list.snapshot().await;
        let allowed = if delta > 0 {
            snapshot.page.has_next
        } else {
            snapshot.page.has_previous
        };
        if !allowed {
            println!("{}", "ℹ️ No hay más páginas en esa dirección.".bright_black());
            return;
        }

        let target = i64::from(snapshot.query.page_number) + delta;
        match u32::try_from(target) {
            Ok(page) => match self.list.set_page(page).await {
                Ok(outcome) => self.report_fetch(outcome),
                Err(e) => println!("{} {}", "❌".bright_red(), e),
            },
            Err(_) => println!("{}", "❌ Página inválida".bright_red()),
        }
    }

    fn pick_department(&self) -> io::Result<Option<Department>> {
        for (index, department) in Department::ALL.iter().enumerate() {
            println!("{}. {}", index + 1, department.label());
        }
        let choice = prompt("Departamento (vacío = todos): ")?;
        Ok(choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|n| Department::ALL.get(n).copied()))
    }

    fn pick_status(&self) -> io::Result<Option<EmploymentStatus>> {
        for (index, status) in EmploymentStatus::ALL.iter().enumerate() {
            println!("{}. {}", index + 1, status.label());
        }
        let choice = prompt("Estado (vacío = todos): ")?;
        Ok(choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|n| EmploymentStatus::ALL.get(n).copied()))
    }

    fn read_id(&self) -> io::Result<Option<i64>> {
        let id = prompt("ID interno del empleado: ")?;
        let parsed = id.parse::<i64>().ok();
        if parsed.is_none() {
            println!("{}", "❌ ID inválido".bright_red());
        }
        Ok(parsed)
    }

    /// Pedir cada campo del formulario; vacío conserva el valor actual
    fn fill_draft(&self, draft: &mut EmployeeDraft, skip: &[EmployeeField]) -> io::Result<()> {
        for field in EmployeeField::ALL {
            if field == EmployeeField::ProfilePicture || skip.contains(&field) {
                continue;
            }
            let current = draft.value(field).unwrap_or_default().to_string();
            let label = if current.is_empty() {
                format!("{}: ", field.display_name())
            } else {
                format!("{} [{}]: ", field.display_name(), current)
            };
            let value = prompt(&label)?;
            if !value.is_empty() {
                draft.set(field, value);
            }
        }
        Ok(())
    }

    fn report_form(&self, outcome: FormOutcome) -> bool {
        match outcome {
            FormOutcome::Saved(record) => {
                println!(
                    "{} {} ({})",
                    "✅ Guardado:".bright_green(),
                    record.display_name(),
                    record.employee_id
                );
                true
            }
            FormOutcome::Invalid(errors) | FormOutcome::Rejected(errors) => {
                println!("{}", "❌ Corrige los siguientes campos:".bright_red());
                for (field, message) in errors.iter() {
                    println!("   • {}: {}", field, message);
                }
                false
            }
            FormOutcome::Failed(message) => {
                println!("{} {}", "❌".bright_red(), message.bright_red());
                false
            }
            FormOutcome::Unauthenticated => {
                println!("{}", "🔒 Sesión caducada, vuelve a iniciar sesión.".bright_red());
                false
            }
        }
    }

    async fn create(&self) -> Result<()> {
        println!("{}", "➕ NUEVO EMPLEADO".bright_cyan().bold());
        let mut draft = EmployeeDraft::new();
        loop {
            self.fill_draft(&mut draft, &[])?;
            if self.report_form(self.form.submit_create(&draft).await) {
                self.report_fetch(self.list.refresh().await);
                return Ok(());
            }
            if prompt("¿Reintentar? (s/N): ")?.to_lowercase() != "s" {
                return Ok(());
            }
        }
    }

    async fn edit(&self) -> Result<()> {
        let Some(id) = self.read_id()? else {
            return Ok(());
        };
        let mut draft = match self.form.load_for_edit(id).await {
            Ok(draft) => draft,
            Err(e) => {
                println!("{} {}", "❌".bright_red(), e.message());
                return Ok(());
            }
        };
        let original_employee_id = draft.employee_id.clone().unwrap_or_default();

        println!("{} {}", "✏️ EDITAR".bright_cyan().bold(), original_employee_id);
        loop {
            self.fill_draft(&mut draft, &[EmployeeField::EmployeeId])?;
            let outcome = self.form.submit_update(id, &original_employee_id, &draft).await;
            if self.report_form(outcome) {
                self.report_fetch(self.list.refresh().await);
                return Ok(());
            }
            if prompt("¿Reintentar? (s/N): ")?.to_lowercase() != "s" {
                return Ok(());
            }
        }
    }

    async fn change_status(&self) -> Result<()> {
        let Some(id) = self.read_id()? else {
            return Ok(());
        };
        let Some(status) = self.pick_status()? else {
            println!("{}", "❌ Estado inválido".bright_red());
            return Ok(());
        };

        match self.api.change_status(id, status).await {
            Ok(record) => {
                println!(
                    "{} {} → {}",
                    "✅".bright_green(),
                    record.employee_id,
                    record.employment_status.label()
                );
                self.report_fetch(self.list.refresh().await);
            }
            Err(e) => println!("{} {}", "❌".bright_red(), e.message()),
        }
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        let Some(id) = self.read_id()? else {
            return Ok(());
        };
        if prompt("¿Seguro que quieres eliminar este empleado? (s/N): ")?.to_lowercase() != "s" {
            return Ok(());
        }

        match self.list.delete(id).await {
            DeleteOutcome::Deleted(outcome) => {
                println!("{}", "🗑️ Empleado eliminado".bright_green());
                self.report_fetch(outcome);
            }
            DeleteOutcome::Failed(message) => println!("{} {}", "❌".bright_red(), message),
        }
        Ok(())
    }

    async fn statistics(&self) {
        match self.api.statistics().await {
            Ok(stats) => {
                println!("{}", "📊 ESTADÍSTICAS".bright_cyan().bold());
                println!("Total:     {}", stats.total_employees);
                println!("Activos:   {}", stats.active_employees);
                println!("Inactivos: {}", stats.inactive_employees);
                for (code, count) in &stats.department_distribution {
                    let name = Department::from_code(code)
                        .map(|d| d.label())
                        .unwrap_or(code.as_str());
                    println!("  {:<24} {}", name, count);
                }
            }
            Err(e) => println!("{} {}", "❌".bright_red(), e.message()),
        }
    }
}
